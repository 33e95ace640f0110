use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use thiserror::Error;
use url::Url;

/// Query parameter carrying the object key on extraction requests.
pub const FILE_KEY_PARAM: &str = "fileKey";

/// Characters escaped when a key is appended to a path. `/` and `\\` are
/// included so a key never adds segments, `%` so the key decodes back unchanged.
const KEY_IN_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("invalid base url {base:?}: {message}")]
    InvalidBase { base: String, message: String },
    #[error("base url {0:?} cannot hold path segments")]
    NotHierarchical(String),
}

/// `PUT` target for `key`: the store base with the encoded key appended verbatim.
///
/// No separator is inserted, so a base ending in a key prefix (`.../2024-`)
/// yields `.../2024-<key>`. A base with an empty path is rooted at `/`.
pub fn upload_url(store_base: &str, key: &str) -> Result<Url, UrlError> {
    let mut url = parse_base(store_base)?;
    if url.cannot_be_a_base() {
        return Err(UrlError::NotHierarchical(store_base.to_string()));
    }
    let path = format!("{}{}", url.path(), utf8_percent_encode(key, KEY_IN_PATH));
    url.set_path(&path);
    Ok(url)
}

/// `GET` target for `key`: `<api base>?fileKey=<form-encoded key>`.
pub fn extract_url(api_base: &str, key: &str) -> Result<Url, UrlError> {
    let mut url = parse_base(api_base)?;
    url.query_pairs_mut().append_pair(FILE_KEY_PARAM, key);
    Ok(url)
}

fn parse_base(base: &str) -> Result<Url, UrlError> {
    Url::parse(base).map_err(|err| UrlError::InvalidBase {
        base: base.to_string(),
        message: err.to_string(),
    })
}

use std::io::{self, Write};

use uploader_core::AppViewModel;
use uploader_logging::uploader_warn;

const OUTPUT_HEADER: &str = "----- extracted text -----";

/// Terminal stand-in for the page: alerts go to `err`, the output element to `out`.
pub struct TerminalSurface<O: Write, E: Write> {
    out: O,
    err: E,
    rendered_revision: u64,
}

impl TerminalSurface<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> TerminalSurface<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            rendered_revision: 0,
        }
    }

    pub fn alert(&mut self, message: &str) {
        if let Err(err) = writeln!(self.err, "alert: {message}") {
            uploader_warn!("Failed to show alert {:?}: {}", message, err);
        }
    }

    /// Prints the output element whenever it was rewritten since the last render.
    pub fn render(&mut self, view: &AppViewModel) {
        if view.output_revision == self.rendered_revision {
            return;
        }
        self.rendered_revision = view.output_revision;
        let text = view.output.as_deref().unwrap_or_default();
        if let Err(err) = self.write_output(text) {
            uploader_warn!("Failed to render output: {}", err);
        }
    }

    fn write_output(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{OUTPUT_HEADER}")?;
        write!(self.out, "{text}")?;
        if !text.ends_with('\n') {
            writeln!(self.out)?;
        }
        self.out.flush()
    }

    #[cfg(test)]
    pub(super) fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(output: &str, revision: u64) -> AppViewModel {
        AppViewModel {
            output: Some(output.to_string()),
            output_revision: revision,
            ..AppViewModel::default()
        }
    }

    #[test]
    fn renders_each_revision_once_and_verbatim() {
        let mut surface = TerminalSurface::new(Vec::new(), Vec::new());
        surface.render(&AppViewModel::default());
        surface.render(&view("  first\n", 1));
        surface.render(&view("  first\n", 1));
        surface.render(&view("second", 2));

        let (out, err) = surface.into_parts();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("{OUTPUT_HEADER}\n  first\n{OUTPUT_HEADER}\nsecond\n")
        );
        assert!(err.is_empty());
    }

    #[test]
    fn same_text_rendered_again_on_new_revision() {
        let mut surface = TerminalSurface::new(Vec::new(), Vec::new());
        surface.render(&view("No text found.", 1));
        surface.render(&view("No text found.", 2));

        let (out, _) = surface.into_parts();
        assert_eq!(String::from_utf8(out).unwrap().matches(OUTPUT_HEADER).count(), 2);
    }

    #[test]
    fn alerts_go_to_error_stream() {
        let mut surface = TerminalSurface::new(Vec::new(), Vec::new());
        surface.alert("Please select a file!");

        let (out, err) = surface.into_parts();
        assert!(out.is_empty());
        assert_eq!(String::from_utf8(err).unwrap(), "alert: Please select a file!\n");
    }
}

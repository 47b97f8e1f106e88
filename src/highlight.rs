use inksac::prelude::*;

/// Colours diagnostics on an interactive terminal. Status lines and job
/// notices have a fixed format and never go through here.
#[derive(Debug, Clone, Copy)]
pub struct Highlighter {
    color_support: ColorSupport,
}

impl Highlighter {
    pub fn new(interactive: bool) -> Self {
        let support = if interactive {
            check_color_support().unwrap_or(ColorSupport::NoColor)
        } else {
            ColorSupport::NoColor
        };
        Self {
            color_support: support,
        }
    }

    pub fn highlight_error(&self, error: &str) -> String {
        if matches!(self.color_support, ColorSupport::NoColor) {
            return error.to_string();
        }

        let error_style = Style::builder().foreground(Color::Red).bold().build();
        error.style(error_style).to_string()
    }

    pub fn highlight_hint(&self, hint: &str) -> String {
        if matches!(self.color_support, ColorSupport::NoColor) {
            return hint.to_string();
        }

        let hint_style = Style::builder()
            .foreground(Color::RGB(128, 128, 128))
            .build();
        hint.style(hint_style).to_string()
    }
}

//! Text object operators

use crate::canvas::Color;
use crate::Align;

/// Font, size, fill and measured width of one text run
pub struct TextRenderContext {
    /// Resource name the font is registered under, without the slash
    pub font_name: String,
    pub font_size: f32,
    /// Advance width of the run in points
    pub text_width: f64,
    pub color: Color,
}

impl TextRenderContext {
    /// Left edge of the run when `anchor_x` is aligned by `align`
    fn start_x(&self, anchor_x: f64, align: Align) -> f64 {
        match align {
            Align::Left => anchor_x,
            Align::Center => anchor_x - self.text_width / 2.0,
            Align::Right => anchor_x - self.text_width,
        }
    }
}

/// Emit a `BT .. ET` block showing an already encoded string literal
///
/// `baseline_y` is in PDF coordinates (origin at the bottom).
pub fn generate_text_operators(
    literal: &str,
    anchor_x: f64,
    baseline_y: f64,
    align: Align,
    ctx: &TextRenderContext,
) -> Vec<u8> {
    let Color { r, g, b } = ctx.color;
    let start = ctx.start_x(anchor_x, align);

    format!(
        "BT\n{r} {g} {b} rg\n/{font} {size} Tf\n{start} {baseline_y} Td\n{literal} Tj\nET\n",
        font = ctx.font_name,
        size = ctx.font_size,
    )
    .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn helvetica(width: f64) -> TextRenderContext {
        TextRenderContext {
            font_name: "F2".to_string(),
            font_size: 11.0,
            text_width: width,
            color: Color::black(),
        }
    }

    fn render(literal: &str, x: f64, align: Align, ctx: &TextRenderContext) -> String {
        String::from_utf8(generate_text_operators(literal, x, 640.0, align, ctx)).unwrap()
    }

    #[test]
    fn test_left_aligned_block() {
        assert_eq!(
            render("(Basic Salary)", 55.0, Align::Left, &helvetica(62.0)),
            "BT\n0 0 0 rg\n/F2 11 Tf\n55 640 Td\n(Basic Salary) Tj\nET\n"
        );
    }

    #[test]
    fn test_right_aligned_amount_ends_at_anchor() {
        let ops = render("(58,000.00)", 292.0, Align::Right, &helvetica(52.0));
        assert!(ops.contains("240 640 Td"));
    }

    #[test]
    fn test_centered_heading() {
        let ops = render("(EARNINGS)", 172.0, Align::Center, &helvetica(60.0));
        assert!(ops.contains("142 640 Td"));
    }

    #[test]
    fn test_fill_color() {
        let ctx = TextRenderContext {
            color: Color::white(),
            ..helvetica(10.0)
        };
        assert!(render("(NET SALARY)", 0.0, Align::Left, &ctx).contains("1 1 1 rg"));
    }
}

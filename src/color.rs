use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::chart::ChartBar;

const NEGATIVE_HUE: f32 = 12.0;
const POSITIVE_HUE: f32 = 210.0;

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Diverging colour scale: PMI → Color32
// ---------------------------------------------------------------------------

/// Colours negative scores warm and positive scores cool, more saturated the
/// further a score is from zero relative to the largest magnitude charted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DivergingScale {
    max_abs: f64,
}

impl DivergingScale {
    /// Scale spanning the largest finite magnitude among `bars`.
    pub fn for_bars(bars: &[ChartBar]) -> Self {
        let max_abs = bars
            .iter()
            .map(|b| b.pmi.abs())
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max);
        Self {
            max_abs: max_abs.max(f64::EPSILON),
        }
    }

    pub fn color_for(&self, pmi: f64) -> Color32 {
        if !pmi.is_finite() {
            return Color32::GRAY;
        }
        let strength = (pmi.abs() / self.max_abs).clamp(0.0, 1.0) as f32;
        let hue = if pmi < 0.0 { NEGATIVE_HUE } else { POSITIVE_HUE };
        hsl_to_color32(hue, 0.2 + 0.6 * strength, 0.55)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars(values: &[f64]) -> Vec<ChartBar> {
        values
            .iter()
            .map(|&pmi| ChartBar {
                word: format!("w{pmi}"),
                pmi,
            })
            .collect()
    }

    #[test]
    fn test_sign_picks_hue() {
        let scale = DivergingScale::for_bars(&bars(&[-3.0, 3.0]));
        let neg = scale.color_for(-3.0);
        let pos = scale.color_for(3.0);
        assert!(neg.r() > neg.b(), "negative should be warm: {neg:?}");
        assert!(pos.b() > pos.r(), "positive should be cool: {pos:?}");
    }

    #[test]
    fn test_magnitude_changes_color() {
        let scale = DivergingScale::for_bars(&bars(&[0.1, 4.0]));
        assert_ne!(scale.color_for(0.1), scale.color_for(4.0));
    }

    #[test]
    fn test_degenerate_inputs() {
        let scale = DivergingScale::for_bars(&[]);
        // Zero range must not divide by zero.
        let _ = scale.color_for(0.0);
        assert_eq!(scale.color_for(f64::NAN), Color32::GRAY);
    }
}

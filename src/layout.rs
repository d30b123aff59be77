//! Page dimension helpers for generated PDFs

/// Simple length type in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length(pub f64);

impl Length {
    /// Create a length from millimeters
    pub fn from_mm(mm: f64) -> Self {
        Length(mm)
    }

    /// Create a length from inches
    pub fn from_inches(inches: f64) -> Self {
        Length(inches * 25.4)
    }

    /// Get the value in millimeters
    pub fn mm(&self) -> f64 {
        self.0
    }

    /// Get the value in points (1/72 inch)
    pub fn pt(&self) -> f64 {
        self.0 * 72.0 / 25.4
    }
}

/// Page dimensions
#[derive(Debug, Clone, Copy)]
pub struct PageDimensions {
    pub width: Length,
    pub height: Length,
}

impl PageDimensions {
    /// US Letter size (8.5" × 11")
    pub fn letter() -> Self {
        Self {
            width: Length::from_inches(8.5),
            height: Length::from_inches(11.0),
        }
    }

    /// A4 size (210mm × 297mm)
    pub fn a4() -> Self {
        Self {
            width: Length::from_mm(210.0),
            height: Length::from_mm(297.0),
        }
    }

    /// MediaBox edges in whole points, `[0 0 w h]`
    pub fn media_box(&self) -> (i64, i64) {
        (
            self.width.pt().round() as i64,
            self.height.pt().round() as i64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inches_to_points() {
        let inch = Length::from_inches(1.0);
        assert!((inch.pt() - 72.0).abs() < 1e-9);
        assert!((inch.mm() - 25.4).abs() < 1e-9);
    }

    #[test]
    fn test_letter_media_box() {
        assert_eq!(PageDimensions::letter().media_box(), (612, 792));
    }

    #[test]
    fn test_a4_media_box() {
        assert_eq!(PageDimensions::a4().media_box(), (595, 842));
    }
}

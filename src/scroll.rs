//! Scroll alignment between a source and a target view
//!
//! Computes the vertical scroll adjustment that lines the target view's
//! cursor up with the source view's cursor in global coordinates, while
//! keeping the target cursor at least `padding` pixels inside the target
//! viewport. When exact alignment would push the cursor outside the padded
//! viewport, the delta is clamped to the nearest padded boundary instead.

/// Geometry inputs for one alignment. Stateless; computed fresh per sync.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAlignment {
    /// Top (y) of the source widget in global coordinates.
    pub source_global_top: f32,
    /// Bottom of the source cursor, measured from the top of the widget.
    pub source_cursor_bottom: f32,
    /// Top (y) of the target widget in global coordinates.
    pub target_global_top: f32,
    /// Bottom of the target cursor, measured from the top of the widget.
    pub target_cursor_bottom: f32,
    /// Height of the target widget.
    pub target_height: f32,
    /// Height of the target cursor.
    pub target_cursor_height: f32,
    /// Minimum distance kept between the cursor and the target's edges.
    pub padding: f32,
}

/// Vertical scroll delta for the target view: `source = target + delta`.
pub fn align_scroll_amount(a: &ScrollAlignment) -> f32 {
    // Raw distance between the two cursors in global coordinates.
    let raw = (a.source_global_top + a.source_cursor_bottom)
        - (a.target_global_top + a.target_cursor_bottom);

    // Constrain so the cursor stays padding pixels from the top of the
    // target, then likewise from the bottom.
    let delta = raw.max(-a.target_cursor_bottom + a.target_cursor_height + a.padding);
    delta.min(a.target_height - a.target_cursor_bottom - a.padding)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alignment(target_cursor_bottom: f32) -> ScrollAlignment {
        ScrollAlignment {
            source_global_top: 0.0,
            source_cursor_bottom: 100.0,
            target_global_top: 0.0,
            target_cursor_bottom,
            target_height: 500.0,
            target_cursor_height: 20.0,
            padding: 10.0,
        }
    }

    #[test]
    fn test_unclamped_delta() {
        // raw = 100 - 50 = 50, within [-20, 440]
        assert_eq!(align_scroll_amount(&alignment(50.0)), 50.0);
    }

    #[test]
    fn test_cursor_near_bottom() {
        // raw = 100 - 490 = -390; lower bound -460 leaves it alone, but the
        // upper bound 500 - 490 - 10 = 0 does not trigger either.
        assert_eq!(align_scroll_amount(&alignment(490.0)), -390.0);
    }

    #[test]
    fn test_clamped_to_top_padding() {
        let a = ScrollAlignment {
            source_cursor_bottom: 0.0,
            target_cursor_bottom: 490.0,
            ..alignment(490.0)
        };
        // raw = -490, clamped to -490 + 20 + 10 = -460
        assert_eq!(align_scroll_amount(&a), -460.0);
    }

    #[test]
    fn test_clamped_to_bottom_padding() {
        let a = ScrollAlignment {
            source_cursor_bottom: 1000.0,
            ..alignment(50.0)
        };
        // raw = 950, clamped to 500 - 50 - 10 = 440
        assert_eq!(align_scroll_amount(&a), 440.0);
    }

    #[test]
    fn test_zero_padding_aligns_exactly() {
        let a = ScrollAlignment {
            padding: 0.0,
            ..alignment(50.0)
        };
        assert_eq!(align_scroll_amount(&a), 50.0);
    }
}

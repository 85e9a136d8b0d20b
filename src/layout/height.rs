/// Height estimation for photos rendered at a fixed column width
///
/// The grid never measures real image sizes. It predicts each tile's height
/// from the photo's intrinsic aspect ratio, which is enough to balance
/// columns and size the scroll area before any image has decoded.

/// Height used whenever the inputs can't produce a sensible estimate
pub const DEFAULT_ITEM_HEIGHT: f32 = 300.0;

/// Width of a single column, or `None` when the container isn't usable.
///
/// `(container_width - total_padding - (columns - 1) * gap) / columns`
pub fn column_width(container_width: f32, total_padding: f32, gap: f32, columns: usize) -> Option<f32> {
    if !container_width.is_finite() || container_width <= 0.0 {
        return None;
    }

    let columns = columns.max(1);
    let gaps = (columns - 1) as f32 * gap.max(0.0);
    let width = (container_width - total_padding.max(0.0) - gaps) / columns as f32;

    (width.is_finite() && width > 0.0).then_some(width)
}

/// Predicted rendered height of a `width` x `height` photo in a column `column_width` wide.
///
/// Always finite and positive.
pub fn estimate_height(width: u32, height: u32, column_width: Option<f32>) -> f32 {
    let Some(column_width) = column_width.filter(|w| w.is_finite() && *w > 0.0) else {
        return DEFAULT_ITEM_HEIGHT;
    };
    if width == 0 || height == 0 {
        return DEFAULT_ITEM_HEIGHT;
    }

    let aspect_ratio = width as f32 / height as f32;
    let estimate = column_width / aspect_ratio;

    if estimate.is_finite() && estimate > 0.0 {
        estimate
    } else {
        DEFAULT_ITEM_HEIGHT
    }
}

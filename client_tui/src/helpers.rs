use ratatui::layout::Rect;

/// Rect of the given size centred in a `cols` x `rows` area, shrunk to fit
pub fn centered_rect(width: u16, height: u16, cols: u16, rows: u16) -> Rect {
    let actual_width = width.min(cols);
    let actual_height = height.min(rows);
    Rect::new(
        (cols - actual_width) / 2,
        (rows - actual_height) / 2,
        actual_width,
        actual_height,
    )
}

/// Same as `centered_rect`, positioned inside `area`
pub fn centered_in(area: Rect, width: u16, height: u16) -> Rect {
    let inner = centered_rect(width, height, area.width, area.height);
    Rect::new(area.x + inner.x, area.y + inner.y, inner.width, inner.height)
}

use ratatui::{prelude::*, widgets::*};

fn key_line(key: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::from(key).light_cyan().bold(),
        Span::raw(" : "),
        Span::raw(action),
    ])
}

/// Clear a centered area of `width` x `height` cells and draw `lines` into it
pub fn render_popup(area: Rect, buf: &mut Buffer, title: &str, lines: Vec<Line>, width: u16) {
    let [_, center_vert, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(lines.len() as u16 + 4),
        Constraint::Fill(1),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width),
        Constraint::Fill(1),
    ])
    .areas(center_vert);

    Clear.render(center, buf);

    Paragraph::new(lines)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .padding(Padding::proportional(1))
                .title(title),
        )
        .wrap(Wrap { trim: false })
        .render(center, buf);
}

pub fn render_help(area: Rect, buf: &mut Buffer, selected_tab: usize) {
    let mut lines = vec![
        key_line("  q  ", "Stop training"),
        key_line("  h  ", "Toggle help popup"),
        key_line(" Tab ", "Switch tabs"),
    ];

    match selected_tab {
        0 => lines.push(key_line("⬅ / ➡", "Switch plots")),
        1 => lines.extend([
            key_line("  s  ", "Toggles target selector widget hidden/visible"),
            key_line("  f  ", "Toggle focus on the selected target only"),
            key_line("⬆ / ⬇", "Switch log target"),
            key_line("⬅ / ➡", "Reduce/increase shown log messages by one level"),
            key_line("- / +", "Reduce/increase captured log messages by one level"),
            key_line("PgUp ", "Enter page mode and scroll up in log history"),
            key_line("PgDn ", "Only in page mode, scroll down in log history"),
            key_line(" Esc ", "Exit page mode"),
        ]),
        _ => {}
    }

    render_popup(area, buf, "Help", lines, 80);
}

/// Yes/no question shown on top of the current screen
pub fn render_prompt(area: Rect, buf: &mut Buffer, question: &str) {
    let lines = vec![
        Line::from(question.to_owned()).bold(),
        Line::default(),
        Line::from(vec![
            Span::from("y").light_green().bold(),
            Span::raw(" yes   "),
            Span::from("n").light_red().bold(),
            Span::raw(" no"),
        ]),
    ];
    render_popup(area, buf, "Demo", lines, 40);
}

use ratatui::{prelude::*, widgets::*};

use crate::demo::Frame;

use super::help::render_popup;

/// Snake board of a single demo frame, with a score header
pub struct Board<'a> {
    frame: &'a Frame,
}

impl<'a> Board<'a> {
    pub fn new(frame: &'a Frame) -> Self {
        Self { frame }
    }

    fn cell(&self, pos: (i32, i32)) -> Span<'static> {
        let Frame { snake, food, .. } = self.frame;
        if snake.first() == Some(&pos) {
            Span::styled("■ ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        } else if snake.contains(&pos) {
            Span::styled("□ ", Style::default().fg(Color::Green))
        } else if *food == pos {
            Span::styled("O ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        } else {
            Span::styled(". ", Style::default().fg(Color::DarkGray))
        }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let n = self.frame.grid_size as i32;
        (0..n)
            .map(|r| Line::from((0..n).map(|c| self.cell((r, c))).collect::<Vec<_>>()))
            .collect()
    }
}

impl Widget for Board<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [header_area, board_area, footer_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(area);

        Paragraph::new(Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                self.frame.score.to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Length: ", Style::default().fg(Color::Yellow)),
            Span::raw(self.frame.snake.len().to_string()),
        ]))
        .block(Block::bordered().border_type(BorderType::Rounded))
        .alignment(Alignment::Center)
        .render(header_area, buf);

        // two columns per cell plus the border
        let side = self.frame.grid_size as u16;
        let [_, grid_area, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(side * 2 + 2),
            Constraint::Fill(1),
        ])
        .areas(board_area);
        let [grid_area, _] =
            Layout::vertical([Constraint::Length(side + 2), Constraint::Fill(1)]).areas(grid_area);

        Paragraph::new(self.lines())
            .block(
                Block::bordered()
                    .border_type(BorderType::Double)
                    .title(" Snake "),
            )
            .render(grid_area, buf);

        Paragraph::new(Line::from(vec![
            Span::from("q").light_cyan().bold(),
            Span::raw(" quit   "),
            Span::from("r").light_cyan().bold(),
            Span::raw(" restart"),
        ]))
        .alignment(Alignment::Center)
        .render(footer_area, buf);

        if self.frame.done {
            let lines = vec![
                Line::from("GAME OVER").light_red().bold(),
                Line::from(format!("Final Score: {}", self.frame.score)),
            ];
            render_popup(board_area, buf, "", lines, 24);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(done: bool) -> Frame {
        Frame {
            grid_size: 4,
            snake: vec![(1, 2), (1, 1), (1, 0)],
            food: (3, 3),
            score: 2,
            done,
        }
    }

    fn row_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn cells() {
        let frame = frame(false);
        let lines = Board::new(&frame).lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(row_text(&lines[0]), ". . . . ");
        assert_eq!(row_text(&lines[1]), "□ □ ■ . ");
        assert_eq!(row_text(&lines[3]), ". . . O ");
    }

    #[test]
    fn game_over_overlay() {
        let frame = frame(true);
        let area = Rect::new(0, 0, 40, 20);
        let mut buf = Buffer::empty(area);
        Board::new(&frame).render(area, &mut buf);

        let text = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf.get(x, y).symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains("GAME OVER"));
        assert!(text.contains("Score: 2"));
    }
}

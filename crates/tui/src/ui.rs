use client::QueryState;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::app::{App, InputMode};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(f.size());

    render_input(f, app, chunks[0]);
    render_body(f, app, chunks[1]);
    render_status(f, app, chunks[2]);
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let content = if app.input.is_empty() && app.mode == InputMode::Normal {
        Span::styled(
            "What needs to be done?",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::raw(app.input.as_str())
    };
    let title = match app.mode {
        InputMode::Normal => "New todo",
        InputMode::Editing => "New todo (editing)",
    };

    let input = Paragraph::new(Line::from(content))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(input, area);
}

fn render_body(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Todos");

    match &app.query_state {
        QueryState::Loading => {
            let frame = SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()];
            let spinner = Paragraph::new(format!("{frame} Loading todos..."))
                .style(Style::default().fg(Color::Blue))
                .block(block);
            f.render_widget(spinner, area);
        }
        QueryState::Error(message) => {
            // クエリエラーは生のテキストをそのまま表示する
            let error = Paragraph::new(format!("Error: {message}"))
                .style(Style::default().fg(Color::Red))
                .block(block);
            f.render_widget(error, area);
        }
        QueryState::Ready(todos) if todos.is_empty() => {
            let empty = Paragraph::new("No todos yet. Add one above!")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            f.render_widget(empty, area);
        }
        QueryState::Ready(todos) => {
            let items: Vec<ListItem> = todos
                .iter()
                .map(|todo| {
                    let checkbox = if todo.completed { "[x] " } else { "[ ] " };
                    let title_style = if todo.completed {
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::CROSSED_OUT)
                    } else {
                        Style::default()
                    };
                    ListItem::new(Line::from(vec![
                        Span::raw(checkbox),
                        Span::styled(todo.title.clone(), title_style),
                    ]))
                })
                .collect();

            let mut state = ListState::default();
            state.select(Some(app.selected));
            let list = List::new(items).block(block).highlight_symbol("> ");
            f.render_stateful_widget(list, area, &mut state);
        }
    }
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let line = match &app.status {
        Some(message) => Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(Span::styled(
            "i: new todo  Enter: add  Space: toggle  d: delete  q: quit",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use client::{ClientError, GraphQlRequest, TodoClient, Transport};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use serde_json::{json, Value};
    use tokio::sync::mpsc;

    /// レンダリングテスト用の、何も返さないトランスポート
    struct NullTransport;

    #[async_trait]
    impl Transport for NullTransport {
        async fn execute(&self, _request: GraphQlRequest) -> Result<Value, ClientError> {
            Err(ClientError::Network("not wired".to_string()))
        }
    }

    fn test_app() -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        App::new(TodoClient::new(Arc::new(NullTransport)), tx)
    }

    fn todo(id: &str, title: &str, completed: bool) -> domain::Todo {
        serde_json::from_value(json!({
            "id": id,
            "title": title,
            "completed": completed,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    fn draw(app: &App) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(48, 12)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
    }

    fn lines(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer.get(x, y).symbol())
                    .collect::<String>()
            })
            .collect()
    }

    /// バッファ内の部分文字列のセル座標を返す
    fn find_cell(terminal: &Terminal<TestBackend>, needle: &str) -> (u16, u16) {
        let rows = lines(terminal);
        let needle_chars: Vec<char> = needle.chars().collect();
        for (y, row) in rows.iter().enumerate() {
            let chars: Vec<char> = row.chars().collect();
            if chars.len() < needle_chars.len() {
                continue;
            }
            for x in 0..=(chars.len() - needle_chars.len()) {
                if chars[x..x + needle_chars.len()] == needle_chars[..] {
                    return (x as u16, y as u16);
                }
            }
        }
        panic!("{needle:?} not found in buffer:\n{}", rows.join("\n"));
    }

    #[tokio::test]
    async fn test_two_rows_with_checkbox_and_strikethrough() {
        // Arrange: 未完了と完了済みの2件
        let mut app = test_app();
        app.query_state =
            QueryState::Ready(vec![todo("1", "Todo 1", false), todo("2", "Todo 2", true)]);

        // Act: 描画
        let terminal = draw(&app);
        let rendered = lines(&terminal).join("\n");

        // Assert: 行ごとにチェックボックスが反映される
        assert!(rendered.contains("[ ] Todo 1"), "buffer:\n{rendered}");
        assert!(rendered.contains("[x] Todo 2"), "buffer:\n{rendered}");

        // Assert: 完了済みタイトルには取り消し線が付く
        let (x, y) = find_cell(&terminal, "Todo 2");
        let buffer = terminal.backend().buffer();
        assert!(buffer
            .get(x, y)
            .modifier
            .contains(Modifier::CROSSED_OUT));

        // Assert: 未完了タイトルには付かない
        let (x, y) = find_cell(&terminal, "Todo 1");
        assert!(!buffer
            .get(x, y)
            .modifier
            .contains(Modifier::CROSSED_OUT));
    }

    #[tokio::test]
    async fn test_empty_list_shows_empty_state_and_no_rows() {
        // Arrange: 0件のReady
        let mut app = test_app();
        app.query_state = QueryState::Ready(vec![]);

        // Act: 描画
        let rendered = lines(&draw(&app)).join("\n");

        // Assert: 空状態メッセージが出て、チェックボックス行は無い
        assert!(rendered.contains("No todos yet. Add one above!"));
        assert!(!rendered.contains("[ ]"));
        assert!(!rendered.contains("[x]"));
    }

    #[tokio::test]
    async fn test_loading_shows_spinner() {
        // Arrange: ロード中
        let app = test_app();

        // Act: 描画
        let rendered = lines(&draw(&app)).join("\n");

        // Assert: スピナー行が出る
        assert!(rendered.contains("Loading todos..."));
    }

    #[tokio::test]
    async fn test_query_error_renders_raw_text() {
        // Arrange: エラー状態
        let mut app = test_app();
        app.query_state = QueryState::Error("Network error: connection refused".to_string());

        // Act: 描画
        let rendered = lines(&draw(&app)).join("\n");

        // Assert: 生のエラーテキストがそのまま載る
        assert!(rendered.contains("Error: Network error: connection refused"));
    }

    #[tokio::test]
    async fn test_status_line_shows_mutation_failure() {
        // Arrange: ミューテーション失敗後のビュー
        let mut app = test_app();
        app.query_state = QueryState::Ready(vec![todo("1", "Todo 1", false)]);
        app.status = Some("Update failed: Network error: connection refused".to_string());

        // Act: 描画
        let rendered = lines(&draw(&app)).join("\n");

        // Assert: ステータス行に失敗が表示され、リストは操作可能なまま
        assert!(rendered.contains("Update failed"));
        assert!(rendered.contains("[ ] Todo 1"));
    }

    #[tokio::test]
    async fn test_placeholder_shown_when_input_empty() {
        // Arrange: 入力が空の通常モード
        let app = test_app();

        // Act: 描画
        let rendered = lines(&draw(&app)).join("\n");

        // Assert: プレースホルダが出る
        assert!(rendered.contains("What needs to be done?"));
    }
}

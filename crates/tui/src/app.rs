use client::{QueryState, TodoClient};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use domain::Todo;
use tokio::sync::mpsc;

/// ミューテーションタスクからビューへ返されるメッセージ
#[derive(Debug, PartialEq, Eq)]
pub enum UiMessage {
    CreateSucceeded,
    MutationFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// リストクエリの購読1本の上に乗るビュー状態
pub struct App {
    client: TodoClient,
    pub query_state: QueryState,
    pub input: String,
    pub mode: InputMode,
    pub selected: usize,
    pub status: Option<String>,
    pub spinner_frame: usize,
    pub should_quit: bool,
    messages_tx: mpsc::UnboundedSender<UiMessage>,
}

impl App {
    pub fn new(client: TodoClient, messages_tx: mpsc::UnboundedSender<UiMessage>) -> Self {
        Self {
            client,
            query_state: QueryState::Loading,
            input: String::new(),
            mode: InputMode::Normal,
            selected: 0,
            status: None,
            spinner_frame: 0,
            should_quit: false,
            messages_tx,
        }
    }

    pub fn on_query_state(&mut self, state: QueryState) {
        self.query_state = state;
        if let QueryState::Ready(todos) = &self.query_state {
            // リストが縮んだときに選択が範囲外に残らないようにする
            if !todos.is_empty() && self.selected >= todos.len() {
                self.selected = todos.len() - 1;
            }
        }
    }

    pub fn on_tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    pub fn on_message(&mut self, message: UiMessage) {
        match message {
            // 成功したときだけ入力欄をクリアする
            UiMessage::CreateSucceeded => {
                self.input.clear();
                self.status = None;
            }
            UiMessage::MutationFailed(text) => self.status = Some(text),
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else { return };
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Editing => self.handle_editing_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('i') => {
                self.mode = InputMode::Editing;
                self.status = None;
            }
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if let QueryState::Ready(todos) = &self.query_state {
                    if self.selected + 1 < todos.len() {
                        self.selected += 1;
                    }
                }
            }
            KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Char('d') => self.delete_selected(),
            _ => {}
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.mode = InputMode::Normal,
            KeyCode::Enter => self.submit_create(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    return;
                }
                self.input.push(c);
            }
            _ => {}
        }
    }

    /// トリム後のタイトルが空なら送信しない
    pub fn submit_create(&mut self) {
        if self.input.trim().is_empty() {
            return;
        }

        let client = self.client.clone();
        let title = self.input.clone();
        let tx = self.messages_tx.clone();
        tokio::spawn(async move {
            match client.create_todo(&title).await {
                Ok(_) => {
                    let _ = tx.send(UiMessage::CreateSucceeded);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create todo");
                    let _ = tx.send(UiMessage::MutationFailed(format!("Create failed: {e}")));
                }
            }
        });
    }

    /// 選択行のcompletedを論理否定してUpdateTodoを送る
    /// 楽観的な反転はせず、サーバー往復とキャッシュ通知を待つ
    pub fn toggle_selected(&mut self) {
        let Some(todo) = self.selected_todo() else {
            return;
        };
        let id = todo.id.clone();
        let next = !todo.completed;

        let client = self.client.clone();
        let tx = self.messages_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = client.set_completed(&id, next).await {
                tracing::error!(error = %e, id = %id, "Failed to update todo");
                let _ = tx.send(UiMessage::MutationFailed(format!("Update failed: {e}")));
            }
        });
    }

    /// 選択行のDeleteTodoを送る。成功すればリストが再取得され行が消える
    pub fn delete_selected(&mut self) {
        let Some(todo) = self.selected_todo() else {
            return;
        };
        let id = todo.id.clone();

        let client = self.client.clone();
        let tx = self.messages_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = client.delete_todo(&id).await {
                tracing::error!(error = %e, id = %id, "Failed to delete todo");
                let _ = tx.send(UiMessage::MutationFailed(format!("Delete failed: {e}")));
            }
        });
    }

    fn selected_todo(&self) -> Option<&Todo> {
        match &self.query_state {
            QueryState::Ready(todos) => todos.get(self.selected),
            _ => None,
        }
    }
}

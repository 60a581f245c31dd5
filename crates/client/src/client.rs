use std::sync::{Arc, Mutex};

use domain::{validate_title, Todo, TodoId};
use serde_json::{json, Value};
use tokio::sync::watch;

use crate::error::ClientError;
use crate::graphql::GraphQlRequest;
use crate::operations::{OperationDef, CREATE_TODO, DELETE_TODO, GET_TODOS, UPDATE_TODO};
use crate::store::{EntityKey, Store};
use crate::transport::Transport;

/// リストクエリ購読の状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState {
    Loading,
    Error(String),
    Ready(Vec<Todo>),
}

/// GraphQLエンドポイントへの唯一の接点
///
/// 正規化キャッシュを所有し、リストクエリの購読者へスナップショットを
/// 配信する。ミューテーションは応答を待ってから更新ポリシーを適用する:
/// 返却オブジェクトの同一性マージと、定義に付与された無効化ディレクティブ。
#[derive(Clone)]
pub struct TodoClient {
    transport: Arc<dyn Transport>,
    store: Arc<Mutex<Store>>,
    todos_tx: watch::Sender<QueryState>,
}

impl TodoClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let (todos_tx, _) = watch::channel(QueryState::Loading);
        Self {
            transport,
            store: Arc::new(Mutex::new(Store::default())),
            todos_tx,
        }
    }

    /// GetTodosをcache-and-networkで購読する
    /// キャッシュ済みスナップショットがあれば即座に配信し、その後
    /// ネットワークから再取得して変化を通知する
    pub fn watch_todos(&self) -> watch::Receiver<QueryState> {
        if let Some(todos) = self.cached_todos() {
            self.publish(QueryState::Ready(todos));
        }
        let rx = self.todos_tx.subscribe();

        let this = self.clone();
        tokio::spawn(async move { this.refresh_todos().await });

        rx
    }

    /// GetTodosをネットワークへ再実行し、結果を購読者へ配信する
    pub async fn refresh_todos(&self) {
        match self.fetch_todos().await {
            Ok(todos) => self.publish(QueryState::Ready(todos)),
            Err(e) => {
                tracing::error!(error = %e, "GetTodos failed");
                self.publish(QueryState::Error(e.to_string()));
            }
        }
    }

    /// タイトルを検証してからCreateTodoを送る
    /// 空タイトルはネットワーク呼び出しなしで弾く
    pub async fn create_todo(&self, title: &str) -> Result<Todo, ClientError> {
        let title = validate_title(title)?;
        let data = self.execute(&CREATE_TODO, json!({ "title": title })).await?;

        let todo: Todo = decode_field(&data, "createTodo")?;
        self.merge_entity_from(&data, "createTodo");
        self.apply_refetch(&CREATE_TODO).await;

        Ok(todo)
    }

    /// UpdateTodoを送り、返却オブジェクトを同一性でキャッシュへマージする
    /// リストの所属は変わらないため再取得はしない
    pub async fn set_completed(&self, id: &TodoId, completed: bool) -> Result<(), ClientError> {
        let data = self
            .execute(&UPDATE_TODO, json!({ "id": id, "completed": completed }))
            .await?;

        self.merge_entity_from(&data, "updateTodo");
        self.apply_refetch(&UPDATE_TODO).await;
        self.publish_current();

        Ok(())
    }

    /// DeleteTodoを送り、リストクエリを無効化して再取得する
    pub async fn delete_todo(&self, id: &TodoId) -> Result<bool, ClientError> {
        let data = self.execute(&DELETE_TODO, json!({ "id": id })).await?;
        let deleted = data
            .get("deleteTodo")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        self.apply_refetch(&DELETE_TODO).await;

        Ok(deleted)
    }

    async fn execute(&self, op: &OperationDef, variables: Value) -> Result<Value, ClientError> {
        self.transport
            .execute(GraphQlRequest {
                query: op.document,
                operation_name: op.name,
                variables,
            })
            .await
    }

    async fn fetch_todos(&self) -> Result<Vec<Todo>, ClientError> {
        let data = self.execute(&GET_TODOS, json!({})).await?;

        let items = match data.get("todos") {
            Some(Value::Array(items)) => items.clone(),
            // スキーマ上 todos はnull許容
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                return Err(ClientError::Decode(format!(
                    "todos should be a list, got: {other}"
                )))
            }
        };

        {
            let mut store = self.store.lock().unwrap();
            let mut refs = Vec::with_capacity(items.len());
            for item in &items {
                // リスト要素もnull許容。nullはスキップする
                let Some(fields) = item.as_object() else {
                    continue;
                };
                let Some(key) = EntityKey::of_todo(fields) else {
                    return Err(ClientError::Decode("todo item without id".to_string()));
                };
                store.merge_entity(key.clone(), fields);
                refs.push(key);
            }
            store.write_query(GET_TODOS.name, refs);
        }

        self.cached_todos()
            .ok_or_else(|| ClientError::Decode("materialized snapshot missing".to_string()))
    }

    /// ミューテーション定義に付与された無効化ディレクティブを適用する
    async fn apply_refetch(&self, op: &OperationDef) {
        for query in op.refetch_queries {
            self.store.lock().unwrap().invalidate(query);

            if *query == GET_TODOS.name {
                self.refresh_todos().await;
            } else {
                tracing::warn!(query = *query, "No refetch handler for invalidated query");
            }
        }
    }

    /// 返却オブジェクトをidで正規化キャッシュへマージする
    fn merge_entity_from(&self, data: &Value, field: &str) {
        let Some(fields) = data.get(field).and_then(Value::as_object) else {
            return;
        };
        let Some(key) = EntityKey::of_todo(fields) else {
            return;
        };
        self.store.lock().unwrap().merge_entity(key, fields);
    }

    /// 実体化済みスナップショットを配信する。失効中は再取得側に任せる
    fn publish_current(&self) {
        if self.store.lock().unwrap().is_stale(GET_TODOS.name) {
            return;
        }
        if let Some(todos) = self.cached_todos() {
            self.publish(QueryState::Ready(todos));
        }
    }

    fn cached_todos(&self) -> Option<Vec<Todo>> {
        let store = self.store.lock().unwrap();
        let bags = store.materialize(GET_TODOS.name)?;

        let mut todos = Vec::with_capacity(bags.len());
        for bag in bags {
            match serde_json::from_value::<Todo>(Value::Object(bag)) {
                Ok(todo) => todos.push(todo),
                Err(e) => {
                    tracing::warn!(error = %e, "Dropping cache entry that no longer decodes");
                }
            }
        }
        Some(todos)
    }

    fn publish(&self, state: QueryState) {
        self.todos_tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }
}

fn decode_field<T: serde::de::DeserializeOwned>(
    data: &Value,
    field: &str,
) -> Result<T, ClientError> {
    let value = data.get(field).cloned().ok_or(ClientError::MissingData)?;
    if value.is_null() {
        return Err(ClientError::MissingData);
    }
    Ok(serde_json::from_value(value)?)
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// サーバーが採番する不透明な識別子
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TodoId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// GraphQLスキーマのTodo型に対応するエンティティ
/// created_at / updated_at はサーバー所有のタイムスタンプ文字列で、
/// クライアント側では解釈しない
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// タイトルを検証し、前後の空白を除去して返す
pub fn validate_title(raw: &str) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_title_trims_whitespace() {
        // Arrange: 前後に空白を含むタイトル
        let raw = "  Buy milk  ";

        // Act: バリデーションを実行
        let result = validate_title(raw);

        // Assert: 空白が除去されたタイトルが返る
        assert_eq!(result, Ok("Buy milk".to_string()));
    }

    #[test]
    fn test_validate_title_rejects_empty() {
        // Arrange: なし

        // Act & Assert: 空文字と空白のみはどちらも拒否される
        assert_eq!(validate_title(""), Err(DomainError::EmptyTitle));
        assert_eq!(validate_title("   "), Err(DomainError::EmptyTitle));
        assert_eq!(validate_title("\t\n"), Err(DomainError::EmptyTitle));
    }

    #[test]
    fn test_todo_wire_format_is_camel_case() {
        // Arrange: サーバーが返すJSON
        let json = serde_json::json!({
            "id": "1",
            "title": "Todo 1",
            "completed": false,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-02T00:00:00Z"
        });

        // Act: デシリアライズ
        let todo: Todo = serde_json::from_value(json.clone()).unwrap();

        // Assert: フィールドが対応し、シリアライズで同じ形に戻る
        assert_eq!(todo.id, TodoId::from("1"));
        assert_eq!(todo.title, "Todo 1");
        assert!(!todo.completed);
        assert_eq!(todo.created_at, "2024-01-01T00:00:00Z");
        assert_eq!(serde_json::to_value(&todo).unwrap(), json);
    }
}

use std::collections::HashMap;

use serde_json::{Map, Value};

/// エンティティを索引する (typename, id) キー
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKey {
    pub typename: String,
    pub id: String,
}

impl EntityKey {
    pub fn todo(id: &str) -> Self {
        Self {
            typename: "Todo".to_string(),
            id: id.to_string(),
        }
    }

    /// 返却オブジェクトのidフィールドからTodoキーを作る
    pub fn of_todo(fields: &Map<String, Value>) -> Option<Self> {
        fields.get("id").and_then(Value::as_str).map(Self::todo)
    }
}

/// プロセス内の正規化ストア
///
/// エンティティは (typename, id) で索引したフィールドの袋として持ち、
/// クエリ結果はエンティティ参照の列として持つ。どのクエリ・ミューテーション
/// 結果からの書き込みも、同じエンティティを参照する全スナップショットに映る。
#[derive(Debug, Default)]
pub struct Store {
    entities: HashMap<EntityKey, Map<String, Value>>,
    queries: HashMap<String, QueryEntry>,
}

#[derive(Debug, Default)]
struct QueryEntry {
    refs: Vec<EntityKey>,
    stale: bool,
}

impl Store {
    /// 返却オブジェクトを同一性でマージする
    /// 結果に含まれないフィールドは既存値を保持する
    pub fn merge_entity(&mut self, key: EntityKey, fields: &Map<String, Value>) {
        let entry = self.entities.entry(key).or_default();
        for (name, value) in fields {
            entry.insert(name.clone(), value.clone());
        }
    }

    /// ネットワーク結果でクエリの参照列を丸ごと置き換える（incomingが勝つ）
    pub fn write_query(&mut self, name: &str, refs: Vec<EntityKey>) {
        self.queries
            .insert(name.to_string(), QueryEntry { refs, stale: false });
    }

    /// 名前付きクエリを失効としてマークする
    pub fn invalidate(&mut self, name: &str) {
        if let Some(entry) = self.queries.get_mut(name) {
            entry.stale = true;
        }
    }

    pub fn is_stale(&self, name: &str) -> bool {
        self.queries.get(name).map(|e| e.stale).unwrap_or(false)
    }

    /// 参照列をエンティティマップから実体化する
    /// 一度も取得していないクエリはNone
    pub fn materialize(&self, name: &str) -> Option<Vec<Map<String, Value>>> {
        let entry = self.queries.get(name)?;
        Some(
            entry
                .refs
                .iter()
                .filter_map(|key| self.entities.get(key).cloned())
                .collect(),
        )
    }
}

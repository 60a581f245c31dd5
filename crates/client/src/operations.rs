//! スキーマから生成された固定のGraphQLドキュメント
//!
//! `refetch_queries` は各ミューテーション定義に付与された明示的な
//! キャッシュ無効化ディレクティブで、完了後に再取得すべき名前付き
//! クエリを列挙する。

#[derive(Debug, Clone, Copy)]
pub struct OperationDef {
    pub name: &'static str,
    pub document: &'static str,
    pub refetch_queries: &'static [&'static str],
}

pub const GET_TODOS: OperationDef = OperationDef {
    name: "GetTodos",
    document: "\
query GetTodos {
  todos {
    id
    title
    completed
    createdAt
    updatedAt
  }
}",
    refetch_queries: &[],
};

pub const CREATE_TODO: OperationDef = OperationDef {
    name: "CreateTodo",
    document: "\
mutation CreateTodo($title: String!) {
  createTodo(title: $title) {
    id
    title
    completed
    createdAt
    updatedAt
  }
}",
    refetch_queries: &["GetTodos"],
};

// リストの所属は変わらないため再取得せず、同一性マージに任せる。
// 選択セットにcreatedAtが無い点はサーバー側スキーマの生成結果のまま。
pub const UPDATE_TODO: OperationDef = OperationDef {
    name: "UpdateTodo",
    document: "\
mutation UpdateTodo($id: ID!, $completed: Boolean!) {
  updateTodo(id: $id, completed: $completed) {
    id
    title
    completed
    updatedAt
  }
}",
    refetch_queries: &[],
};

pub const DELETE_TODO: OperationDef = OperationDef {
    name: "DeleteTodo",
    document: "\
mutation DeleteTodo($id: ID!) {
  deleteTodo(id: $id)
}",
    refetch_queries: &["GetTodos"],
};

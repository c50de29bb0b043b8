use shared::AppError;
use std::fmt;
use std::str::FromStr;

/// 公開しているリモートプロシージャ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Procedure {
    Create,
    Get,
    List,
    Update,
    Delete,
}

/// 読み取り専用かどうか（GET で呼べるのはクエリだけ）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcedureKind {
    Query,
    Mutation,
}

impl Procedure {
    pub const ALL: [Procedure; 5] = [
        Procedure::Create,
        Procedure::Get,
        Procedure::List,
        Procedure::Update,
        Procedure::Delete,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Procedure::Create => "create",
            Procedure::Get => "get",
            Procedure::List => "list",
            Procedure::Update => "update",
            Procedure::Delete => "delete",
        }
    }

    pub fn kind(&self) -> ProcedureKind {
        match self {
            Procedure::Get | Procedure::List => ProcedureKind::Query,
            Procedure::Create | Procedure::Update | Procedure::Delete => ProcedureKind::Mutation,
        }
    }

    pub fn is_query(&self) -> bool {
        self.kind() == ProcedureKind::Query
    }
}

impl FromStr for Procedure {
    type Err = AppError;

    /// 正式名のほか、既存クライアントが使っている名前も受け付ける
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "create" | "createTodo" => Ok(Procedure::Create),
            "get" | "getTodo" => Ok(Procedure::Get),
            "list" | "getTodos" => Ok(Procedure::List),
            "update" | "updateTodo" => Ok(Procedure::Update),
            "delete" | "deleteTodo" => Ok(Procedure::Delete),
            other => Err(AppError::UnknownProcedure(other.to_string())),
        }
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

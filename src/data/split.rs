use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// 数据集划分
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Split {
    Train,
    Val,
    Test,
    /// 其它自定义划分，名称即子目录名
    Other(String),
}

impl Split {
    /// 划分对应的子目录名
    pub fn as_str(&self) -> &str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
            Split::Other(name) => name,
        }
    }
}

impl Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Split {
    fn from(name: &str) -> Self {
        match name {
            "train" => Split::Train,
            "val" => Split::Val,
            "test" => Split::Test,
            other => Split::Other(other.to_string()),
        }
    }
}

impl From<String> for Split {
    fn from(name: String) -> Self {
        Split::from(name.as_str())
    }
}

impl From<Split> for String {
    fn from(split: Split) -> Self {
        split.as_str().to_string()
    }
}

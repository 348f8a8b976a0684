use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }
    };
}

string_id!(CategoryId);
string_id!(SeriesId);
string_id!(TaskId);

/// Full address of a task. Task ids are only unique inside their series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskRef {
    pub category: CategoryId,
    pub series: SeriesId,
    pub task: TaskId,
}

impl TaskRef {
    pub fn new(
        category: impl Into<CategoryId>,
        series: impl Into<SeriesId>,
        task: impl Into<TaskId>,
    ) -> Self {
        Self {
            category: category.into(),
            series: series.into(),
            task: task.into(),
        }
    }
}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.category, self.series, self.task)
    }
}

/// Hands out ids for entities the data source left unnamed.
///
/// Ids are `{prefix}{n}` with a counter shared by all kinds; an id already
/// present in the scope is skipped, so generated ids never collide with
/// supplied ones.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdGenerator {
    pub fn fresh<F>(&mut self, prefix: &str, taken: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        loop {
            let candidate = format!("{prefix}{}", self.next);
            self.next += 1;
            if !taken(&candidate) {
                return candidate;
            }
        }
    }
}

use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Body returned by successful deletes.
#[derive(Serialize, Debug, Default)]
pub struct Empty {}

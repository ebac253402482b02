//! Test doubles shared by the unit tests of this crate.

use crate::chat::{ChatBackend, ChatError, Reply};
use crate::persona::ChatTurn;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub history: Vec<ChatTurn>,
    pub prompt: String,
}

/// Backend returning pre-scripted results in order, recording every call.
///
/// Once the script is exhausted it answers with `"(no more replies)"`.
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<Reply, ChatError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedBackend {
    pub fn new(script: Vec<Result<Reply, ChatError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn model_name(&self) -> &str {
        "scripted-model"
    }

    async fn generate(&self, history: &[ChatTurn], prompt: &str) -> Result<Reply, ChatError> {
        self.calls.lock().unwrap().push(RecordedCall {
            history: history.to_vec(),
            prompt: prompt.to_string(),
        });
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Reply::text("(no more replies)")))
    }
}

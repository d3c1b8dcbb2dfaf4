use crate::Dispatcher;
use cloudclaw_core::types::Message;

/// Process-lifetime binding of one dispatcher and its transcript. One turn
/// runs at a time; nothing is persisted past the session.
pub struct Session {
    dispatcher: Dispatcher,
    transcript: Vec<Message>,
}

impl Session {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            transcript: Vec::new(),
        }
    }

    /// Runs one turn and records the user/assistant exchange.
    pub async fn turn(&mut self, user_text: &str) -> String {
        let outcome = self.dispatcher.handle(user_text, &self.transcript).await;
        self.transcript.push(Message::user(user_text));
        self.transcript.push(Message::assistant(outcome.clone()));
        outcome
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }
}

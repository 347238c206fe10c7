// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Channel transport.
//!
//! Hands events to a collector task over an unbounded tokio channel. Sending
//! never blocks the intercepted call; a closed channel is a transport error.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::engine_core::errors::InterceptorError;
use crate::engine_core::models::SecurityEvent;
use crate::engine_core::traits::EventTransport;

#[derive(Debug, Clone)]
pub enum TransportMessage {
    Enter(Arc<SecurityEvent>),
    Exit(Arc<SecurityEvent>),
}

impl TransportMessage {
    pub fn event(&self) -> &Arc<SecurityEvent> {
        match self {
            TransportMessage::Enter(event) | TransportMessage::Exit(event) => event,
        }
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, TransportMessage::Exit(_))
    }
}

#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<TransportMessage>,
}

impl ChannelTransport {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TransportMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, message: TransportMessage) -> Result<(), InterceptorError> {
        self.tx
            .send(message)
            .map_err(|_| InterceptorError::Transport("collector channel closed".to_string()))
    }
}

impl EventTransport for ChannelTransport {
    fn emit(&self, event: Arc<SecurityEvent>) -> Result<(), InterceptorError> {
        self.send(TransportMessage::Enter(event))
    }

    fn emit_completion(&self, event: Arc<SecurityEvent>) -> Result<(), InterceptorError> {
        self.send(TransportMessage::Exit(event))
    }
}

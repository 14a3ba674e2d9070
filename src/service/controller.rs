// Copyright 2025 jonefeewang@gmail.com
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

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tracing::info;

use super::{AppError, AppResult};

/// Whether this node may currently mutate topic metadata.
///
/// Leadership itself is decided elsewhere (cluster membership), this only
/// records the outcome so the admin handlers can refuse work when the node
/// is not the controller.
#[derive(Debug)]
pub struct ControllerRole {
    node_id: i32,
    leader: AtomicBool,
    injected_error: Mutex<Option<String>>,
}

impl ControllerRole {
    pub fn new(node_id: i32, leader: bool) -> Self {
        ControllerRole {
            node_id,
            leader: AtomicBool::new(leader),
            injected_error: Mutex::new(None),
        }
    }

    pub fn node_id(&self) -> i32 {
        self.node_id
    }

    pub fn is_leader(&self) -> bool {
        self.leader.load(Ordering::Acquire)
    }

    pub fn set_leader(&self, leader: bool) {
        let was = self.leader.swap(leader, Ordering::AcqRel);
        if was != leader {
            info!(node_id = self.node_id, leader, "controller role changed");
        }
    }

    /// Makes every following availability check fail as unavailable until cleared.
    pub fn set_injected_error(&self, message: Option<String>) {
        *self.injected_error.lock() = message;
    }

    pub fn check_available(&self) -> AppResult<()> {
        if let Some(message) = self.injected_error.lock().as_ref() {
            return Err(AppError::Unavailable(message.clone()));
        }
        if !self.is_leader() {
            return Err(AppError::NotController(format!(
                "node {} is not the controller",
                self.node_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leader_is_available() {
        let role = ControllerRole::new(1, true);
        assert!(role.check_available().is_ok());
    }

    #[test]
    fn follower_is_not_controller() {
        let role = ControllerRole::new(1, false);
        assert!(matches!(
            role.check_available(),
            Err(AppError::NotController(_))
        ));
        role.set_leader(true);
        assert!(role.check_available().is_ok());
    }

    #[test]
    fn injected_error_wins_until_cleared() {
        let role = ControllerRole::new(1, true);
        role.set_injected_error(Some("injected unavailable".to_string()));
        match role.check_available() {
            Err(AppError::Unavailable(msg)) => assert_eq!(msg, "injected unavailable"),
            other => panic!("unexpected result: {:?}", other),
        }
        role.set_injected_error(None);
        assert!(role.check_available().is_ok());
    }
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod browser_session;
pub mod chromium_engine;
pub mod dynamic_extractor;
pub mod reqwest_engine;
pub mod router;
#[cfg(test)]
pub(crate) mod test_support;
pub mod traits;
pub mod user_agents;

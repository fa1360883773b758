mod embedders;
mod llm_client;
mod message;
pub mod providers;

pub use embedders::*;
pub use llm_client::*;
pub use message::*;

#[cfg(test)]
pub(crate) mod testing {
    pub use super::llm_client::testing::ScriptedProvider;
}

//! # LLM Helpers
//!
//! Provider dispatch shared by every skill. The provider match lives in one
//! place; the structured-output and tool-calling macros build on it.

/// Bind the configured provider client to `$llm` and evaluate `$body` with it.
///
/// Must be used inside a function returning `anyhow::Result`.
#[macro_export]
macro_rules! with_llm {
    ($config:expr, |$llm:ident| $body:expr) => {{
        use radkit::models::providers::{
            AnthropicLlm, DeepSeekLlm, GeminiLlm, GrokLlm, OpenAILlm, OpenRouterLlm,
        };
        use $crate::models::LlmProvider;

        let config = $config;
        match config.provider {
            LlmProvider::Anthropic => {
                let $llm = AnthropicLlm::from_env(&config.model)?;
                $body
            }
            LlmProvider::OpenAI => {
                let $llm = match &config.base_url {
                    Some(base_url) => OpenAILlm::from_env(&config.model)?.with_base_url(base_url),
                    None => OpenAILlm::from_env(&config.model)?,
                };
                $body
            }
            LlmProvider::Gemini => {
                let $llm = GeminiLlm::from_env(&config.model)?;
                $body
            }
            LlmProvider::OpenRouter => {
                let $llm = OpenRouterLlm::from_env(&config.model)?;
                $body
            }
            LlmProvider::Grok => {
                let $llm = GrokLlm::from_env(&config.model)?;
                $body
            }
            LlmProvider::DeepSeek => {
                let $llm = DeepSeekLlm::from_env(&config.model)?;
                $body
            }
        }
    }};
}

/// Single structured-output call (no tools).
#[macro_export]
macro_rules! run_llm_function {
    ($config:expr, $output_type:ty, $system_prompt:expr, $input:expr) => {{
        use radkit::agent::LlmFunction;

        let result: anyhow::Result<$output_type> = $crate::with_llm!($config, |llm| {
            let func =
                LlmFunction::<$output_type>::new_with_system_instructions(llm, $system_prompt);
            func.run($input).await.map_err(Into::into)
        });
        result
    }};
}

/// Structured-output call with tools the model may invoke before answering.
#[macro_export]
macro_rules! run_llm_worker {
    ($config:expr, $output_type:ty, $system_prompt:expr, $input:expr, $($tool:expr),* $(,)?) => {{
        use radkit::agent::LlmWorker;

        let result: anyhow::Result<$output_type> = $crate::with_llm!($config, |llm| {
            let worker = LlmWorker::<$output_type>::builder(llm)
                .with_system_instructions($system_prompt)
                $(.with_tool($tool))*
                .build();
            worker.run($input).await.map_err(Into::into)
        });
        result
    }};
}

pub use run_llm_function;
pub use run_llm_worker;
pub use with_llm;

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::VecDeque;
use time::{Date, OffsetDateTime};

/// What the page needs from the environment hosting it.
pub trait PageHost {
    fn now(&self) -> OffsetDateTime;

    /// Blocking yes/no dialog; nothing else runs until it returns.
    fn confirm(&mut self, message: &str) -> bool;

    fn today(&self) -> Date {
        self.now().date()
    }
}

/// Host with a frozen clock and queued confirmation answers.
#[derive(Debug, Clone)]
pub struct ScriptedHost {
    now: OffsetDateTime,
    answers: VecDeque<bool>,
    fallback_answer: bool,
    prompts: Vec<String>,
}

impl ScriptedHost {
    pub fn new(now: OffsetDateTime) -> Self {
        Self {
            now,
            answers: VecDeque::new(),
            fallback_answer: false,
            prompts: Vec::new(),
        }
    }

    pub fn answering(mut self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.answers.extend(answers);
        self
    }

    /// Answer used once the queue is empty.
    pub fn with_fallback_answer(mut self, answer: bool) -> Self {
        self.fallback_answer = answer;
        self
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl PageHost for ScriptedHost {
    fn now(&self) -> OffsetDateTime {
        self.now
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.prompts.push(message.to_owned());
        self.answers.pop_front().unwrap_or(self.fallback_answer)
    }
}

#[cfg(test)]
mod tests {
    use super::{PageHost, ScriptedHost};
    use time::macros::{date, datetime};

    #[test]
    fn scripted_host_replays_answers_then_falls_back() {
        let mut host = ScriptedHost::new(datetime!(2026-10-18 9:30 UTC))
            .answering([true, false])
            .with_fallback_answer(true);

        assert!(host.confirm("first"));
        assert!(!host.confirm("second"));
        assert!(host.confirm("third"));
        assert_eq!(host.prompts(), ["first", "second", "third"]);
        assert_eq!(host.today(), date!(2026 - 10 - 18));
    }
}

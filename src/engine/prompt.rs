use std::collections::VecDeque;

/// Synchronous follow-up questions, answered before a command is dispatched.
pub trait Prompt {
    /// `None` when no answer can be given; the question then becomes the response.
    fn ask(&mut self, question: &str) -> Option<String>;
}

/// For hosts that cannot ask back, such as a request/response endpoint.
pub struct NoPrompt;

impl Prompt for NoPrompt {
    fn ask(&mut self, _question: &str) -> Option<String> {
        None
    }
}

/// Answers from a fixed queue, recording every question asked.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedPrompt {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, question: &str) -> Option<String> {
        self.asked.push(question.to_string());
        self.answers.pop_front()
    }
}

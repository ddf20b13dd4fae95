use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum OutputBlock {
    Title(String),
    Text(String),
    Event(String),
    Exits(String),
}

impl OutputBlock {
    pub fn text(&self) -> &str {
        match self {
            OutputBlock::Title(s)
            | OutputBlock::Text(s)
            | OutputBlock::Event(s)
            | OutputBlock::Exits(s) => s,
        }
    }
}

/// Everything one turn wants the presentation layer to show.
#[derive(Default, Debug, Clone, Serialize)]
pub struct Output {
    pub blocks: Vec<OutputBlock>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&mut self, s: impl Into<String>) {
        self.push(OutputBlock::Title(s.into()));
    }

    pub fn say(&mut self, s: impl Into<String>) {
        self.push(OutputBlock::Text(s.into()));
    }

    pub fn event(&mut self, s: impl Into<String>) {
        self.push(OutputBlock::Event(s.into()));
    }

    pub fn set_exits(&mut self, s: impl Into<String>) {
        let s = s.into();
        if s.trim().is_empty() {
            return;
        }

        // only one Exits block, always last
        self.blocks.retain(|b| !matches!(b, OutputBlock::Exits(_)));
        self.blocks.push(OutputBlock::Exits(s));
    }

    /// Response lines in display order; multi-line blocks are split.
    pub fn lines(&self) -> Vec<String> {
        self.blocks
            .iter()
            .flat_map(|b| b.text().lines())
            .map(str::to_string)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// True if any block is exactly `text`.
    pub fn contains(&self, text: &str) -> bool {
        self.blocks.iter().any(|b| b.text() == text)
    }

    fn push(&mut self, block: OutputBlock) {
        if !block.text().trim().is_empty() {
            self.blocks.push(block);
        }
    }
}

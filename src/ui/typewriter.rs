#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TypewriterConfig {
    pub type_speed_ms: u32,
    pub erase_speed_ms: u32,
    pub delay_between_ms: u32,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            type_speed_ms: 150,
            erase_speed_ms: 80,
            delay_between_ms: 2_000,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Typing,
    Erasing,
}

/// Two-phase text cycler. The machine only holds indices; the text list is
/// passed in on every call so props can own it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Typewriter {
    pub index: usize,
    pub prefix_len: usize,
    pub phase: Phase,
}

impl Default for Typewriter {
    fn default() -> Self {
        Self {
            index: 0,
            prefix_len: 0,
            phase: Phase::Typing,
        }
    }
}

impl Typewriter {
    pub fn next_delay<S: AsRef<str>>(&self, texts: &[S], config: &TypewriterConfig) -> Option<u32> {
        let current = texts.get(self.index)?;

        Some(match self.phase {
            Phase::Typing if self.prefix_len >= char_len(current.as_ref()) => config.delay_between_ms,
            Phase::Typing => config.type_speed_ms,
            Phase::Erasing => config.erase_speed_ms,
        })
    }

    pub fn advance<S: AsRef<str>>(&mut self, texts: &[S]) {
        let Some(current) = texts.get(self.index) else {
            *self = Self::default();
            return;
        };

        match self.phase {
            Phase::Typing => {
                if self.prefix_len < char_len(current.as_ref()) {
                    self.prefix_len += 1;
                } else {
                    self.phase = Phase::Erasing;
                }
            }
            Phase::Erasing => {
                self.prefix_len = self.prefix_len.saturating_sub(1);
                if self.prefix_len == 0 {
                    self.index = (self.index + 1) % texts.len();
                    self.phase = Phase::Typing;
                }
            }
        }
    }

    pub fn displayed<S: AsRef<str>>(&self, texts: &[S]) -> String {
        texts
            .get(self.index)
            .map(|text| text.as_ref().chars().take(self.prefix_len).collect())
            .unwrap_or_default()
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

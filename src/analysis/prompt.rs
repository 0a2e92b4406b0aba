//! Analysis prompts

use super::traits::PromptProvider;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Language of the instruction text
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptLanguage {
    English,
    Persian,
}

/// Get the built-in prompt provider for a language
pub fn prompt_for(language: PromptLanguage) -> Box<dyn PromptProvider> {
    match language {
        PromptLanguage::English => Box::new(EnglishPrompt),
        PromptLanguage::Persian => Box::new(PersianPrompt),
    }
}

/// Transcription and call-quality analysis in English
#[derive(Debug, Default, Clone, Copy)]
pub struct EnglishPrompt;

impl PromptProvider for EnglishPrompt {
    fn analysis_prompt(&self) -> String {
        "Transcribe this recording as accurately as possible, then analyze it.\n\
\n\
Answer in Markdown with these sections:\n\
\n\
## 1. Full transcript\n\
The complete conversation, keeping pauses and repetitions.\n\
\n\
## 2. Minute-by-minute breakdown\n\
For each minute: what was said, the tone, and the speaker's emotional state.\n\
\n\
## 3. Sentiment and satisfaction\n\
Overall satisfaction on a 1-10 scale, and every moment of frustration or anger with its timestamp.\n\
\n\
## 4. Key points and follow-ups\n\
Requests made, commitments given, and anything left unresolved.\n"
            .to_string()
    }
}

/// Transcription and call-quality analysis answered in Persian
#[derive(Debug, Default, Clone, Copy)]
pub struct PersianPrompt;

impl PromptProvider for PersianPrompt {
    fn analysis_prompt(&self) -> String {
        "Transcribe this recording as accurately as possible, then analyze it. Write the whole answer in Persian.\n\
\n\
ویس را با دقت کامل به متن تبدیل کن و سپس آن را تحلیل کن.\n\
\n\
## ۱. رونوشت کامل مکالمه\n\
\n\
## ۲. تحلیل دقیقه به دقیقه\n\
برای هر دقیقه: محتوا، لحن و احساسات گوینده.\n\
\n\
## ۳. تحلیل احساسات و رضایت\n\
سطح رضایت از ۱ تا ۱۰ و لحظات ناراحتی یا عصبانیت با زمان دقیق.\n\
\n\
## ۴. نکات کلیدی و پیگیری‌ها\n"
            .to_string()
    }
}

/// Fixed prompt supplied by the caller
#[derive(Debug, Clone)]
pub struct StaticPrompt(pub String);

impl PromptProvider for StaticPrompt {
    fn analysis_prompt(&self) -> String {
        self.0.clone()
    }
}

//! Turns HTML into the flat start/end/text event stream the tokenizer consumes.

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent {
    StartTag(String),
    EndTag(String),
    Text(String),
}

/// Collects tokenizer output as events, joining adjacent character runs.
#[derive(Default)]
struct EventSink {
    events: Vec<MarkupEvent>,
    text: String,
}

impl EventSink {
    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.events.push(MarkupEvent::Text(std::mem::take(&mut self.text)));
        }
    }
}

impl TokenSink for EventSink {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::CharacterTokens(chars) => self.text.push_str(&chars),
            Token::NullCharacterToken => self.text.push('\0'),
            Token::ParseError(_) => {}
            Token::TagToken(tag) => {
                self.flush_text();
                let name = tag.name.to_string();
                match tag.kind {
                    TagKind::StartTag => {
                        self.events.push(MarkupEvent::StartTag(name.clone()));
                        if tag.self_closing {
                            self.events.push(MarkupEvent::EndTag(name));
                        } else if name == "script" {
                            return TokenSinkResult::RawData(RawKind::ScriptData);
                        } else if name == "style" {
                            return TokenSinkResult::RawData(RawKind::Rawtext);
                        }
                    }
                    TagKind::EndTag => self.events.push(MarkupEvent::EndTag(name)),
                }
            }
            // comments, doctypes, EOF
            _ => self.flush_text(),
        }
        TokenSinkResult::Continue
    }
}

/// Tokenize `html` and report tags and text in source order.
///
/// No tree is built: tags are not matched, repaired or implied. A self-closing tag
/// (`<b/>`) yields a start immediately followed by an end, and stray end tags are
/// reported as-is, so the stream is only as balanced as the source.
/// Tag names are lowercase; entities are decoded; `script`/`style` bodies are raw text.
/// Comments and doctypes are dropped.
pub fn scan(html: &str) -> Vec<MarkupEvent> {
    let mut input = BufferQueue::new();
    input.push_back(StrTendril::from_slice(html));
    let mut tokenizer = Tokenizer::new(EventSink::default(), TokenizerOpts::default());
    let _ = tokenizer.feed(&mut input);
    tokenizer.end();
    let mut sink = tokenizer.sink;
    sink.flush_text();
    sink.events
}

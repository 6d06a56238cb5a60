use crate::index::WeightedToken;
use crate::markup::MarkupEvent;
use crate::weights::TagWeightTable;

/// Folds a markup event stream into weighted tokens.
///
/// The structural weight is a running balance: opening a weighted tag adds its weight,
/// closing it subtracts the same amount. There is no tag stack, so unbalanced input
/// shifts the weight for the rest of the document.
pub struct StructuralTokenizer<'a> {
    table: &'a TagWeightTable,
    current_weight: f64,
    tokens: Vec<WeightedToken>,
}

impl<'a> StructuralTokenizer<'a> {
    pub fn new(table: &'a TagWeightTable) -> Self {
        Self { table, current_weight: 0.0, tokens: Vec::new() }
    }

    pub fn push(&mut self, event: MarkupEvent) {
        match event {
            MarkupEvent::StartTag(name) => {
                if let Some(w) = self.table.get(&name) {
                    self.current_weight += w;
                }
            }
            MarkupEvent::EndTag(name) => {
                if let Some(w) = self.table.get(&name) {
                    self.current_weight -= w;
                }
            }
            MarkupEvent::Text(content) => {
                let content = content.to_lowercase();
                let content = content.trim();
                if content.is_empty() {
                    return;
                }
                let weight = self.current_weight;
                self.tokens.extend(
                    content.split_whitespace().map(|word| WeightedToken { word: word.to_string(), weight }),
                );
            }
        }
    }

    /// Weight still "open" after the events seen so far. Zero (up to rounding) for balanced input.
    pub fn residual_weight(&self) -> f64 { self.current_weight }

    pub fn finish(self) -> Vec<WeightedToken> { self.tokens }
}

/// Tokenize one document's event stream into `(word, structural weight)` pairs in source order.
pub fn tokenize<I>(events: I, table: &TagWeightTable) -> Vec<WeightedToken>
where
    I: IntoIterator<Item = MarkupEvent>,
{
    let mut tokenizer = StructuralTokenizer::new(table);
    for event in events {
        tokenizer.push(event);
    }
    let residual = tokenizer.residual_weight();
    if residual.abs() > 1e-9 {
        tracing::debug!(residual, "unbalanced tags left structural weight open");
    }
    tokenizer.finish()
}

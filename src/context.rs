//! Context assembly for retrieved facts and entities.
//!
//! Search output is rendered into a fixed plain-text block the answering
//! model receives. The layout is part of the benchmark contract: facts carry
//! their temporal validity range, entities carry their graph summary.

use crate::memory::{RetrievedEntity, RetrievedFact};

/// Context block handed to the answering model. `{facts}` and `{entities}`
/// are replaced with the rendered result lines.
pub const CONTEXT_TEMPLATE: &str = "
FACTS and ENTITIES represent relevant context to the current conversation.

# These are the most relevant facts and their valid date ranges. If the fact is about an event, the event takes place during this time.
# format: FACT (Date range: from - to)
<FACTS>
{facts}
</FACTS>

# These are the most relevant entities
# ENTITY_NAME: entity summary
<ENTITIES>
{entities}
</ENTITIES>
";

/// Render a fact's validity window, with placeholders for open bounds.
pub fn format_fact_date_range(fact: &RetrievedFact) -> String {
    format!(
        "{} - {}",
        fact.valid_at.as_deref().unwrap_or("date unknown"),
        fact.invalid_at.as_deref().unwrap_or("present"),
    )
}

/// Compose the full context block from search results, preserving the
/// reranked order of both lists.
pub fn compose_search_context(facts: &[RetrievedFact], entities: &[RetrievedEntity]) -> String {
    let fact_block = facts
        .iter()
        .map(|fact| format!("  - {} ({})", fact.fact, format_fact_date_range(fact)))
        .collect::<Vec<_>>()
        .join("\n");
    let entity_block = entities
        .iter()
        .map(|entity| format!("  - {}: {}", entity.name, entity.summary))
        .collect::<Vec<_>>()
        .join("\n");

    // One left-to-right pass, so placeholder-like text inside retrieved
    // content is never itself substituted.
    let mut context =
        String::with_capacity(CONTEXT_TEMPLATE.len() + fact_block.len() + entity_block.len());
    let mut rest = CONTEXT_TEMPLATE;
    for (placeholder, block) in
        [("{facts}", fact_block.as_str()), ("{entities}", entity_block.as_str())]
    {
        if let Some((head, tail)) = rest.split_once(placeholder) {
            context.push_str(head);
            context.push_str(block);
            rest = tail;
        }
    }
    context.push_str(rest);
    context
}

use crate::markup::sanitize;
use crate::model::{Priority, Recommendation};
use crate::report::block::{Block, TextStyle};
use crate::report::style::ReportStyle;

const MAX_ACTIONS: usize = 5;

/// Groups by priority (high, medium, low), keeping the original order inside
/// each group, and numbers the result from 1 across all groups.
pub fn numbered(recommendations: &[Recommendation]) -> Vec<(usize, &Recommendation)> {
    Priority::ORDER
        .iter()
        .flat_map(|priority| recommendations.iter().filter(move |r| r.priority == *priority))
        .enumerate()
        .map(|(i, r)| (i + 1, r))
        .collect()
}

pub fn render(recommendations: &[Recommendation], _style: &ReportStyle) -> Vec<Block> {
    let mut blocks = vec![Block::heading("Recomendaciones")];
    if recommendations.is_empty() {
        blocks.push(Block::body("No hay recomendaciones para este período."));
        return blocks;
    }

    let mut current: Option<Priority> = None;
    for (number, rec) in numbered(recommendations) {
        if current != Some(rec.priority) {
            current = Some(rec.priority);
            blocks.push(Block::paragraph(TextStyle::Subheading, rec.priority.label()));
        }

        blocks.push(Block::body(format!("<strong>{}. {}</strong>", number, sanitize(&rec.title))));
        blocks.push(Block::body(sanitize(&rec.technical_description)));
        blocks.push(Block::body(format!(
            "<strong>En palabras simples:</strong> {}",
            sanitize(&rec.simple_description)
        )));

        if !rec.actions.is_empty() {
            let actions: Vec<String> = rec
                .actions
                .iter()
                .take(MAX_ACTIONS)
                .map(|a| format!("- {}", sanitize(a)))
                .collect();
            blocks.push(Block::body(format!("<strong>Acciones:</strong><br/>{}", actions.join("<br/>"))));
        }

        blocks.push(Block::body(format!(
            "<strong>Impacto esperado:</strong> {}<br/><strong>Plazo de implementación:</strong> {}",
            sanitize(&rec.expected_impact),
            sanitize(&rec.implementation_time)
        )));
        blocks.push(Block::Spacer(3.0));
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::sections::test_support::recommendation;

    #[test]
    fn grouped_in_priority_order_with_global_numbering() {
        let recs = vec![
            recommendation("bajo 1", Priority::Low),
            recommendation("alto 1", Priority::High),
            recommendation("medio 1", Priority::Medium),
            recommendation("alto 2", Priority::High),
            recommendation("bajo 2", Priority::Low),
        ];
        let ordered: Vec<(usize, &str)> = numbered(&recs).iter().map(|(n, r)| (*n, r.title.as_str())).collect();
        assert_eq!(
            ordered,
            vec![(1, "alto 1"), (2, "alto 2"), (3, "medio 1"), (4, "bajo 1"), (5, "bajo 2")]
        );
    }

    #[test]
    fn group_headings_and_titles() {
        let recs = vec![
            recommendation("medio", Priority::Medium),
            recommendation("alto", Priority::High),
        ];
        let blocks = render(&recs, &ReportStyle::default());
        let text: Vec<&str> = blocks.iter().filter_map(Block::markup).collect();
        let high = text.iter().position(|t| *t == "Prioridad Alta").unwrap();
        let medium = text.iter().position(|t| *t == "Prioridad Media").unwrap();
        assert!(high < medium);
        assert!(!text.contains(&"Prioridad Baja"));
        assert!(text.contains(&"<strong>1. alto</strong>"));
        assert!(text.contains(&"<strong>2. medio</strong>"));
    }

    #[test]
    fn at_most_five_actions_and_sanitized_text() {
        let mut rec = recommendation("riego", Priority::High);
        rec.actions = (1..=7).map(|i| format!("acción {}", i)).collect();
        rec.technical_description = "a<br><br>b".into();
        let blocks = render(&[rec], &ReportStyle::default());
        let actions = blocks
            .iter()
            .filter_map(Block::markup)
            .find(|m| m.starts_with("<strong>Acciones:"))
            .unwrap();
        assert!(actions.contains("- acción 5"));
        assert!(!actions.contains("acción 6"));
        assert!(blocks.iter().any(|b| b.markup() == Some("a<br/><br/>b")));
    }

    #[test]
    fn empty_list() {
        let blocks = render(&[], &ReportStyle::default());
        assert_eq!(blocks.len(), 2);
    }
}

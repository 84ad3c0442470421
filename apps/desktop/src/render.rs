//! Plain-text rendering of publications for the terminal.

use client_core::{SortDirection, SortDirective};
use shared::domain::Publication;

fn arrow(direction: Option<SortDirection>) -> &'static str {
    direction.unwrap_or(SortDirection::Desc).arrow()
}

pub fn header(sort: SortDirective) -> String {
    format!(
        "ID\tТип\tНазвание\tДата {}\tСтатус {}\tАвторы",
        arrow(sort.date_direction()),
        arrow(sort.status_direction())
    )
}

pub fn row(publication: &Publication) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        publication.id,
        publication.kind,
        publication.title,
        publication.created_at,
        publication.status.label(),
        publication.authors
    )
}

pub fn details(publication: &Publication) -> String {
    let mut lines = vec![
        format!("#{} {}", publication.id, publication.title),
        format!("Тип: {}", publication.kind),
        format!("Статус: {}", publication.status.label()),
        format!("Дата: {}", publication.created_at),
        format!("Авторы: {}", publication.authors),
    ];
    if !publication.coauthors.is_empty() {
        lines.push(format!("Соавторы: {}", publication.coauthors));
    }
    if publication.is_collective_authors {
        lines.push("Коллектив авторов".to_string());
    }
    lines.push(format!(
        "Контакт: {}, {}, {}",
        publication.contact_name, publication.contact_phone, publication.contact_email
    ));
    if !publication.expert_number.is_empty() {
        lines.push(format!(
            "Экспертиза №{} от {} ({} – {})",
            publication.expert_number,
            publication.expert_date,
            publication.expert_start,
            publication.expert_end
        ));
    }
    lines.join("\n")
}

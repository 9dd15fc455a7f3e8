// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::filter::matches_text;
use crate::{MyTicketRow, MyTickets, Visibility};

impl MyTicketRow {
    fn matches(&self, search: &str, status: &str) -> bool {
        let badge = self.status_badge.as_deref().unwrap_or_default().trim();
        matches_text(&self.cells.join(" "), search) && (status.is_empty() || badge == status)
    }
}

impl MyTickets {
    /// Re-evaluates every row and returns how many remain visible.
    pub fn apply_filters(&mut self) -> usize {
        let search = self.search.as_deref().unwrap_or_default().to_lowercase();
        let status = self.status.clone().unwrap_or_default();
        let mut visible = 0;
        for row in &mut self.rows {
            let matched = row.matches(&search, &status);
            row.visibility = Visibility::from_match(matched);
            visible += usize::from(matched);
        }
        visible
    }
}

#[cfg(test)]
mod tests {
    use crate::{MyTicketRow, MyTickets, Visibility};

    fn row(description: &str, badge: Option<&str>) -> MyTicketRow {
        MyTicketRow {
            cells: vec!["#3".to_owned(), description.to_owned()],
            status_badge: badge.map(str::to_owned),
            visibility: Visibility::Shown,
        }
    }

    fn list(search: Option<&str>, status: Option<&str>) -> MyTickets {
        MyTickets {
            search: search.map(str::to_owned),
            status: status.map(str::to_owned),
            rows: vec![
                row("Correo no sincroniza", Some(" Abierto ")),
                row("Pantalla rota", Some("Cerrado")),
                row("Sin insignia", None),
            ],
        }
    }

    #[test]
    fn absent_controls_show_everything() {
        assert_eq!(list(None, None).apply_filters(), 3);
    }

    #[test]
    fn status_badge_is_trimmed_and_exact() {
        let mut tickets = list(None, Some("Abierto"));
        assert_eq!(tickets.apply_filters(), 1);
        assert_eq!(tickets.rows[0].visibility, Visibility::Shown);
        assert_eq!(tickets.rows[2].visibility, Visibility::Hidden);
    }

    #[test]
    fn search_and_status_combine() {
        let mut tickets = list(Some("PANTALLA"), Some(""));
        assert_eq!(tickets.apply_filters(), 1);
        assert!(tickets.rows[1].visibility.is_shown());

        tickets.status = Some("Abierto".to_owned());
        assert_eq!(tickets.apply_filters(), 0);
    }
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;
use url::Url;

use crate::export::{CsvDownload, export_table};
use crate::feedback::{ClickOutcome, click};
use crate::filter::{Criteria, FilterPolicy, matches};
use crate::pagination::{LinkTarget, carry_filters};
use crate::{
    ButtonId, ControlId, EXPORT_BUTTON, EXPORT_TABLE, FieldId, KNOWN_TABLES, LinkId, Locale, Page,
    PageHost, TableId, Visibility,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSettings {
    pub known_tables: Vec<TableId>,
    pub export_table: TableId,
    pub policy: FilterPolicy,
    pub locale: Locale,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            known_tables: KNOWN_TABLES.into_iter().map(TableId::from).collect(),
            export_table: TableId::from(EXPORT_TABLE),
            policy: FilterPolicy::default(),
            locale: Locale::default(),
        }
    }
}

/// Listeners attached once when the page loads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bindings {
    controls: BTreeMap<ControlId, TableId>,
    export: bool,
    ticket_form: bool,
    my_search: bool,
    my_status: bool,
}

impl Bindings {
    pub fn attach(page: &Page) -> Self {
        let my_tickets = page.my_tickets.as_ref();
        Self {
            controls: page
                .controls
                .iter()
                .map(|control| (control.id.clone(), control.table.clone()))
                .collect(),
            export: page.button(&ButtonId::from(EXPORT_BUTTON)).is_some(),
            ticket_form: page.ticket_form().is_some(),
            my_search: my_tickets.is_some_and(|list| list.search.is_some()),
            my_status: my_tickets.is_some_and(|list| list.status.is_some()),
        }
    }

    pub fn table_for(&self, control: &ControlId) -> Option<&TableId> {
        self.controls.get(control)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCommand {
    /// `input`/`change` on a filter control.
    ControlInput { control: ControlId, value: String },
    ExportClicked,
    LinkClicked(LinkId),
    DescriptionInput(String),
    CategorySelected(String),
    SubmitTicketForm,
    ButtonClicked(ButtonId),
    MySearchInput(String),
    MyStatusChanged(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEffect {
    RowsFiltered {
        table: TableId,
        visible: usize,
        total: usize,
    },
    CounterUpdated {
        table: TableId,
        text: String,
    },
    Download(CsvDownload),
    Navigate(Url),
    FollowLink(String),
    Alert(String),
    Focused(FieldId),
    SubmissionBlocked,
    SubmissionAccepted,
    DescriptionResized {
        rows: u16,
    },
    ButtonLoading(ButtonId),
    ActionCancelled(ButtonId),
    ClickIgnored(ButtonId),
    MyTicketsFiltered {
        visible: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    page: Page,
    settings: DashboardSettings,
    bindings: Bindings,
}

impl Dashboard {
    /// Binds listeners and runs the initial filter pass over every known
    /// table present on the page.
    pub fn load<H>(page: Page, settings: DashboardSettings, host: &H) -> (Self, Vec<PageEffect>)
    where
        H: PageHost + ?Sized,
    {
        let bindings = Bindings::attach(&page);
        let mut dashboard = Self {
            page,
            settings,
            bindings,
        };
        let mut effects = Vec::new();
        for table in dashboard.settings.known_tables.clone() {
            effects.extend(dashboard.refresh(&table, host));
        }
        (dashboard, effects)
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn into_page(self) -> Page {
        self.page
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn criteria_for<H>(&self, table: &TableId, host: &H) -> Criteria
    where
        H: PageHost + ?Sized,
    {
        Criteria::from_controls(
            |kind| {
                self.page
                    .control_for(kind, table)
                    .map(|control| control.value.as_str())
            },
            host.today(),
            self.settings.policy,
        )
    }

    /// Recomputes visibility for every row of `table`, then its counter.
    pub fn refresh<H>(&mut self, table: &TableId, host: &H) -> Vec<PageEffect>
    where
        H: PageHost + ?Sized,
    {
        let criteria = self.criteria_for(table, host);
        let Some(rows) = self.page.table_mut(table).map(|table| &mut table.rows) else {
            return Vec::new();
        };
        for row in rows.iter_mut() {
            row.visibility = Visibility::from_match(matches(row, &criteria));
        }
        let total = rows.len();
        let visible = rows.iter().filter(|row| row.is_visible()).count();
        tracing::debug!(%table, visible, total, "filtered table");

        let mut effects = vec![PageEffect::RowsFiltered {
            table: table.clone(),
            visible,
            total,
        }];
        effects.extend(self.update_counter(table));
        effects
    }

    pub fn update_counter(&mut self, table: &TableId) -> Option<PageEffect> {
        let visible = self.page.table(table)?.visible_count();
        let counter = self.page.counter_mut(table)?;
        counter.text = visible.to_string();
        Some(PageEffect::CounterUpdated {
            table: table.clone(),
            text: counter.text.clone(),
        })
    }

    pub fn export<H>(&self, table: &TableId, host: &H) -> Option<CsvDownload>
    where
        H: PageHost + ?Sized,
    {
        match export_table(&self.page, table, host.now()) {
            Ok(download) => {
                if let Some(download) = &download {
                    tracing::info!(%table, file = %download.file_name, "exported visible rows");
                }
                download
            }
            Err(error) => {
                tracing::warn!(%table, error = %format!("{error:#}"), "export failed");
                None
            }
        }
    }

    pub fn dispatch<H>(&mut self, command: PageCommand, host: &mut H) -> Vec<PageEffect>
    where
        H: PageHost + ?Sized,
    {
        match command {
            PageCommand::ControlInput { control, value } => {
                let Some(table) = self.bindings.table_for(&control).cloned() else {
                    return Vec::new();
                };
                if let Some(control) = self.page.control_mut(&control) {
                    control.value = value;
                }
                self.refresh(&table, host)
            }
            PageCommand::ExportClicked => {
                if !self.bindings.export {
                    return Vec::new();
                }
                let table = self.settings.export_table.clone();
                self.export(&table, host)
                    .map(PageEffect::Download)
                    .into_iter()
                    .collect()
            }
            PageCommand::LinkClicked(link) => match carry_filters(&self.page, &link) {
                Some(LinkTarget::Rewritten(url)) => vec![PageEffect::Navigate(url)],
                Some(LinkTarget::Default(href)) => vec![PageEffect::FollowLink(href)],
                None => Vec::new(),
            },
            PageCommand::DescriptionInput(value) => {
                if !self.bindings.ticket_form {
                    return Vec::new();
                }
                let Some(fields) = self.page.ticket_fields_mut() else {
                    return Vec::new();
                };
                fields.description.value = value;
                let rows = fields.description.fit_to_content();
                vec![PageEffect::DescriptionResized { rows }]
            }
            PageCommand::CategorySelected(value) => {
                if let Some(fields) = self.page.ticket_fields_mut() {
                    fields.category = value;
                }
                Vec::new()
            }
            PageCommand::SubmitTicketForm => self.submit_ticket_form(),
            PageCommand::ButtonClicked(button) => {
                match click(&mut self.page, &button, host) {
                    Some(ClickOutcome::Loading) => vec![PageEffect::ButtonLoading(button)],
                    Some(ClickOutcome::Cancelled) => vec![PageEffect::ActionCancelled(button)],
                    Some(ClickOutcome::Ignored) => vec![PageEffect::ClickIgnored(button)],
                    Some(ClickOutcome::Proceeded) | None => Vec::new(),
                }
            }
            PageCommand::MySearchInput(value) => {
                if !self.bindings.my_search {
                    return Vec::new();
                }
                self.filter_my_tickets(|list| list.search = Some(value))
            }
            PageCommand::MyStatusChanged(value) => {
                if !self.bindings.my_status {
                    return Vec::new();
                }
                self.filter_my_tickets(|list| list.status = Some(value))
            }
        }
    }

    fn submit_ticket_form(&mut self) -> Vec<PageEffect> {
        let Some((_, fields)) = self.page.ticket_form() else {
            return Vec::new();
        };
        let issues = fields.issues();
        if issues.is_empty() {
            return vec![PageEffect::SubmissionAccepted];
        }

        let mut effects = vec![PageEffect::SubmissionBlocked];
        for issue in &issues {
            tracing::debug!(%issue, "ticket form rejected");
            effects.push(PageEffect::Alert(
                issue.message(self.settings.locale).to_owned(),
            ));
        }
        if let Some(first) = issues.first() {
            self.page.focus = Some(first.field());
            effects.push(PageEffect::Focused(first.field()));
        }
        effects
    }

    fn filter_my_tickets<F>(&mut self, update: F) -> Vec<PageEffect>
    where
        F: FnOnce(&mut crate::MyTickets),
    {
        let Some(list) = self.page.my_tickets.as_mut() else {
            return Vec::new();
        };
        update(list);
        let visible = list.apply_filters();
        vec![PageEffect::MyTicketsFiltered { visible }]
    }
}

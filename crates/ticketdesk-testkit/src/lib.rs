// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::path::PathBuf;
use ticketdesk_app::{
    Button, ButtonKind, Counter, EXPORT_BUTTON, FilterControl, FilterKind, Form, FormId,
    KNOWN_TABLES, MyTicketRow, MyTickets, Page, PageLink, Row, Section, Table, TableId, TextArea,
    TicketFields, Visibility,
};
use time::macros::{datetime, format_description};
use time::{Duration, OffsetDateTime};
use url::Url;

const DEPARTMENTS: [&str; 6] = ["IT", "RRHH", "Finanzas", "Ventas", "Operaciones", "Legal"];

const TECHNICIANS: [&str; 8] = [
    "Ana Ruiz",
    "Carlos Méndez",
    "Lucía Torres",
    "Diego Herrera",
    "Sofía Castro",
    "Javier Molina",
    "Valeria Rojas",
    "Mateo Vargas",
];

const PRIORITIES: [&str; 4] = ["baja", "media", "alta", "maxima"];

const CATEGORIES: [&str; 6] = [
    "Hardware",
    "Software",
    "Redes",
    "Accesos",
    "Impresoras",
    "Telefonía",
];

const ISSUES: [&str; 14] = [
    "La impresora del piso 2 no imprime",
    "No puedo acceder al correo",
    "El monitor parpadea",
    "Solicitud de acceso a la carpeta compartida",
    "La VPN se desconecta cada hora",
    "El teclado no responde",
    "Instalar software de contabilidad",
    "Restablecer contraseña del sistema de nómina",
    "Teléfono IP sin tono",
    "El proyector de la sala B no enciende",
    "Lentitud en el sistema de ventas",
    "Error al sincronizar calendario",
    "Reemplazo de batería de portátil",
    "Configurar escáner en red",
];

pub const STATUS_OPEN: &str = "Abierto";
pub const STATUS_IN_PROGRESS: &str = "En Progreso";
pub const STATUS_CLOSED: &str = "Cerrado";

const HEADERS: [&str; 7] = [
    "ID",
    "Descripción",
    "Departamento",
    "Técnico",
    "Prioridad",
    "Estado",
    "Fecha",
];

const TICKETS_PER_TABLE: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: i64,
    pub description: String,
    pub category: String,
    pub department: String,
    pub technician: Option<String>,
    pub priority: String,
    pub status: String,
    pub created_at: OffsetDateTime,
}

impl Ticket {
    pub fn to_row(&self) -> Result<Row> {
        let date = self
            .created_at
            .format(format_description!(
                "[year]-[month]-[day] [hour]:[minute]:[second]"
            ))
            .context("format ticket timestamp")?;
        let technician = self.technician.clone().unwrap_or_default();
        Ok(Row {
            status: Some(self.status.clone()),
            priority: Some(self.priority.clone()),
            department: Some(self.department.clone()),
            technician: Some(technician.clone()),
            date: Some(date.clone()),
            ..Row::new([
                format!("#{}", self.id),
                self.description.clone(),
                self.department.clone(),
                if technician.is_empty() {
                    "Sin asignar".to_owned()
                } else {
                    technician
                },
                self.priority.clone(),
                self.status.clone(),
                date,
            ])
        })
    }
}

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

#[derive(Debug, Clone)]
pub struct TicketFaker {
    rng: DeterministicRng,
    next_id: i64,
    now: OffsetDateTime,
}

impl TicketFaker {
    pub fn new(seed: u64) -> Self {
        Self::at(seed, reference_now())
    }

    /// Ticket dates are spread over the 60 days before `now`.
    pub fn at(seed: u64, now: OffsetDateTime) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_id: 1,
            now,
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn ticket(&mut self, status: &str) -> Ticket {
        let id = self.next_id;
        self.next_id += 1;
        let minutes_back = self.rng.int_n(60 * 24 * 60) as i64;
        Ticket {
            id,
            description: self.pick(&ISSUES).to_owned(),
            category: self.pick(&CATEGORIES).to_owned(),
            department: self.pick(&DEPARTMENTS).to_owned(),
            technician: Some(self.pick(&TECHNICIANS).to_owned()),
            priority: self.pick(&PRIORITIES).to_owned(),
            status: status.to_owned(),
            created_at: self.now - Duration::minutes(minutes_back),
        }
    }

    pub fn unassigned_ticket(&mut self) -> Ticket {
        Ticket {
            technician: None,
            ..self.ticket(STATUS_OPEN)
        }
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    /// A full admin dashboard: every known table with its section, filter
    /// controls, counter and pagination link, plus the export button, the
    /// ticket form, a confirm-guarded delete button and the personal list.
    pub fn dashboard_page(&mut self) -> Result<Page> {
        let location =
            Url::parse("https://helpdesk.example/admin/dashboard").context("parse demo URL")?;
        let mut page = Page::new(location);
        let mut all = Vec::new();

        for table_name in KNOWN_TABLES {
            let table_id = TableId::new(table_name);
            let tickets: Vec<Ticket> = match table_name {
                "unassigned-tickets" => (0..TICKETS_PER_TABLE)
                    .map(|_| self.unassigned_ticket())
                    .collect(),
                "open-tickets" => self.batch(STATUS_OPEN),
                "in-progress-tickets" => self.batch(STATUS_IN_PROGRESS),
                "closed-tickets" => self.batch(STATUS_CLOSED),
                _ => all.clone(),
            };
            if table_name != "all-tickets" {
                all.extend(tickets.iter().cloned());
            }

            let rows = tickets
                .iter()
                .map(Ticket::to_row)
                .collect::<Result<Vec<_>>>()?;
            page.tables.push(Table {
                id: table_id.clone(),
                headers: HEADERS.iter().map(|&header| header.to_owned()).collect(),
                rows,
            });
            add_table_chrome(&mut page, &table_id);
        }

        page.buttons.push(Button {
            id: EXPORT_BUTTON.into(),
            kind: ButtonKind::Marked,
            form: None,
            label: "Exportar CSV".to_owned(),
            confirm: None,
            loading: false,
            saved_label: None,
        });
        add_ticket_form(&mut page);
        add_delete_form(&mut page, all.first().map_or(1, |ticket| ticket.id));
        page.my_tickets = Some(self.my_tickets(5));
        Ok(page)
    }

    fn batch(&mut self, status: &str) -> Vec<Ticket> {
        (0..TICKETS_PER_TABLE).map(|_| self.ticket(status)).collect()
    }

    fn my_tickets(&mut self, count: usize) -> MyTickets {
        let statuses = [STATUS_OPEN, STATUS_IN_PROGRESS, STATUS_CLOSED];
        let rows = (0..count)
            .map(|_| {
                let status = self.pick(&statuses).to_owned();
                let ticket = self.ticket(&status);
                MyTicketRow {
                    cells: vec![
                        format!("#{}", ticket.id),
                        ticket.description,
                        ticket.category,
                    ],
                    status_badge: Some(status),
                    visibility: Visibility::Shown,
                }
            })
            .collect();
        MyTickets {
            search: Some(String::new()),
            status: Some(String::new()),
            rows,
        }
    }
}

fn add_table_chrome(page: &mut Page, table: &TableId) {
    let slug = table.as_str().trim_end_matches("-tickets");
    for kind in FilterKind::ALL {
        page.controls.push(FilterControl {
            id: format!("{}-{slug}", kind.class_name()).into(),
            kind,
            table: table.clone(),
            value: String::new(),
        });
    }
    page.counters.push(Counter {
        table: table.clone(),
        text: String::new(),
    });
    page.sections.push(Section {
        id: slug.into(),
        tables: vec![table.clone()],
    });
    page.links.push(PageLink {
        id: format!("next-{slug}").into(),
        href: format!("?section={slug}&page=2"),
        section: Some(slug.into()),
    });
}

fn add_ticket_form(page: &mut Page) {
    let form = FormId::new("new-ticket");
    page.forms.push(Form {
        id: form.clone(),
        ticket: Some(TicketFields {
            description: TextArea {
                value: String::new(),
                cols: 60,
                rows: 3,
                min_rows: 3,
            },
            category: String::new(),
        }),
        interactive: true,
    });
    page.buttons.push(Button {
        id: "create-ticket".into(),
        kind: ButtonKind::Submit,
        form: Some(form),
        label: "Crear ticket".to_owned(),
        confirm: None,
        loading: false,
        saved_label: None,
    });
}

fn add_delete_form(page: &mut Page, ticket_id: i64) {
    let form = FormId::new(format!("delete-{ticket_id}"));
    page.forms.push(Form {
        id: form.clone(),
        ticket: None,
        interactive: true,
    });
    page.buttons.push(Button {
        id: format!("delete-{ticket_id}").into(),
        kind: ButtonKind::Marked,
        form: Some(form),
        label: "Eliminar".to_owned(),
        confirm: Some(format!(
            "¿Está seguro de que desea eliminar el ticket #{ticket_id}?"
        )),
        loading: false,
        saved_label: None,
    });
}

pub fn temp_snapshot_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("page.json");
    Ok((dir, path))
}

pub fn departments() -> &'static [&'static str] {
    &DEPARTMENTS
}

pub fn categories() -> &'static [&'static str] {
    &CATEGORIES
}

pub fn reference_now() -> OffsetDateTime {
    datetime!(2026-10-18 9:00 UTC)
}

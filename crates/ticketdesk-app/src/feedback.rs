// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{ButtonId, ButtonKind, Page, PageHost};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Inside a guarded form that would fail validation.
    Ignored,
    /// The confirmation prompt was declined.
    Cancelled,
    /// Action goes ahead with no visual change.
    Proceeded,
    Loading,
}

/// `None` when the button is not on the page.
pub fn click<H>(page: &mut Page, id: &ButtonId, host: &mut H) -> Option<ClickOutcome>
where
    H: PageHost + ?Sized,
{
    let button = page.button(id)?;
    let form = button.form.clone();

    let blocked = form
        .as_ref()
        .and_then(|form| page.form(form))
        .and_then(|form| form.ticket.as_ref())
        .is_some_and(|ticket| !ticket.is_valid());
    if blocked {
        tracing::debug!(button = %id, "click ignored; form fails validation");
        return Some(ClickOutcome::Ignored);
    }

    let confirmed = match &button.confirm {
        Some(message) if !host.confirm(message) => {
            tracing::info!(button = %id, "destructive action declined");
            return Some(ClickOutcome::Cancelled);
        }
        Some(_) => true,
        None => false,
    };

    if button.kind == ButtonKind::Plain && !confirmed {
        return Some(ClickOutcome::Proceeded);
    }

    let button = page.button_mut(id)?;
    if !button.loading {
        button.saved_label = Some(std::mem::take(&mut button.label));
        button.loading = true;
    }
    if let Some(form) = form.and_then(|form| page.form_mut(&form)) {
        form.interactive = false;
    }
    Some(ClickOutcome::Loading)
}

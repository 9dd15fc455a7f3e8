// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use unicode_width::UnicodeWidthStr;

use crate::{FieldId, Locale, TextArea, TicketFields};

pub const MIN_DESCRIPTION_CHARS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormIssue {
    DescriptionTooShort,
    MissingCategory,
}

impl FormIssue {
    pub const fn field(self) -> FieldId {
        match self {
            Self::DescriptionTooShort => FieldId::Description,
            Self::MissingCategory => FieldId::Category,
        }
    }

    pub const fn message(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::DescriptionTooShort, Locale::Es) => {
                "Por favor, proporcione una descripción más detallada (mínimo 10 caracteres)."
            }
            (Self::DescriptionTooShort, Locale::En) => {
                "Please provide a more detailed description (minimum 10 characters)."
            }
            (Self::MissingCategory, Locale::Es) => "Por favor, seleccione una categoría.",
            (Self::MissingCategory, Locale::En) => "Please select a category.",
        }
    }
}

impl std::fmt::Display for FormIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message(Locale::En))
    }
}

impl std::error::Error for FormIssue {}

impl TicketFields {
    /// Every failing check, description first.
    pub fn issues(&self) -> Vec<FormIssue> {
        let mut issues = Vec::new();
        if self.description.value.trim().chars().count() < MIN_DESCRIPTION_CHARS {
            issues.push(FormIssue::DescriptionTooShort);
        }
        if self.category.is_empty() {
            issues.push(FormIssue::MissingCategory);
        }
        issues
    }

    pub fn is_valid(&self) -> bool {
        self.issues().is_empty()
    }
}

impl TextArea {
    /// Rows needed to show the whole value at the current column width.
    pub fn content_rows(&self) -> u16 {
        let cols = usize::from(self.cols.max(1));
        let lines: usize = self
            .value
            .split('\n')
            .map(|line| UnicodeWidthStr::width(line).div_ceil(cols).max(1))
            .sum();
        u16::try_from(lines).unwrap_or(u16::MAX)
    }

    /// Resizes to fit the content, never below `min_rows`.
    pub fn fit_to_content(&mut self) -> u16 {
        self.rows = self.content_rows().max(self.min_rows);
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::FormIssue;
    use crate::{FieldId, Locale, TextArea, TicketFields};

    fn fields(description: &str, category: &str) -> TicketFields {
        TicketFields {
            description: TextArea {
                value: description.to_owned(),
                cols: 20,
                rows: 3,
                min_rows: 3,
            },
            category: category.to_owned(),
        }
    }

    #[test]
    fn nine_characters_is_too_short() {
        assert_eq!(
            fields("123456789", "Hardware").issues(),
            vec![FormIssue::DescriptionTooShort]
        );
    }

    #[test]
    fn ten_characters_with_category_is_valid() {
        assert!(fields("1234567890", "Hardware").is_valid());
    }

    #[test]
    fn description_is_trimmed_before_counting() {
        assert!(!fields("   short    \n", "Hardware").is_valid());
    }

    #[test]
    fn accented_characters_count_once() {
        assert!(fields("máquina rota", "Hardware").is_valid());
    }

    #[test]
    fn both_checks_report_independently() {
        let issues = fields("", "").issues();
        assert_eq!(
            issues,
            vec![FormIssue::DescriptionTooShort, FormIssue::MissingCategory]
        );
        assert_eq!(issues[0].field(), FieldId::Description);
        assert_eq!(issues[1].field(), FieldId::Category);
    }

    #[test]
    fn messages_follow_locale() {
        assert_eq!(
            FormIssue::MissingCategory.message(Locale::Es),
            "Por favor, seleccione una categoría."
        );
        assert_eq!(
            FormIssue::DescriptionTooShort.to_string(),
            "Please provide a more detailed description (minimum 10 characters)."
        );
    }

    #[test]
    fn text_area_grows_with_wrapped_and_explicit_lines() {
        let mut area = fields("", "").description;
        assert_eq!(area.fit_to_content(), 3);

        area.value = "a".repeat(45);
        assert_eq!(area.content_rows(), 3);

        area.value = format!("{}\n\n\nend", "b".repeat(30));
        assert_eq!(area.fit_to_content(), 5);

        area.value = "ok".to_owned();
        assert_eq!(area.fit_to_content(), 3);
    }
}

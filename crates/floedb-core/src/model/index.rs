use std::fmt;

///
/// SortOrder
///
/// Per-field sort direction within an index key pattern.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn is_descending(self) -> bool {
        matches!(self, Self::Desc)
    }
}

///
/// IndexField
///
/// One field of an index key pattern.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IndexField {
    pub name: &'static str,
    pub order: SortOrder,
}

impl IndexField {
    #[must_use]
    pub const fn asc(name: &'static str) -> Self {
        Self {
            name,
            order: SortOrder::Asc,
        }
    }

    #[must_use]
    pub const fn desc(name: &'static str) -> Self {
        Self {
            name,
            order: SortOrder::Desc,
        }
    }
}

///
/// IndexModel
///
/// Static declaration of an index: name, key pattern, uniqueness.
/// Field count is validated when the index is registered with a catalog,
/// not here, so the constructor can stay `const`.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IndexModel {
    pub name: &'static str,
    pub fields: &'static [IndexField],
    pub unique: bool,
}

impl IndexModel {
    #[must_use]
    pub const fn new(name: &'static str, fields: &'static [IndexField], unique: bool) -> Self {
        Self {
            name,
            fields,
            unique,
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for IndexModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unique {
            write!(f, "UNIQUE ")?;
        }
        write!(f, "{}(", self.name)?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if field.order.is_descending() {
                write!(f, "-")?;
            }
            write!(f, "{}", field.name)?;
        }
        write!(f, ")")
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_pattern() {
        const FIELDS: &[IndexField] = &[IndexField::asc("region"), IndexField::desc("score")];
        let model = IndexModel::new("region_score", FIELDS, true);
        assert_eq!(model.to_string(), "UNIQUE region_score(region, -score)");
    }

    #[test]
    fn display_omits_unique_when_not_unique() {
        const FIELDS: &[IndexField] = &[IndexField::asc("id")];
        let model = IndexModel::new("pk", FIELDS, false);
        assert_eq!(model.to_string(), "pk(id)");
    }
}

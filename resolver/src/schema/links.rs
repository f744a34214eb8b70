use super::schema::{ColumnId, TableId};

pub type ForeignKeyId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Reference {
    pub table_id: TableId,
    pub column_id: ColumnId,
}

impl Reference {
    pub fn new(table_id: TableId, column_id: ColumnId) -> Self {
        Self {
            table_id,
            column_id,
        }
    }
}

/// A validated foreign key: `base` references `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForeignKey {
    pub id: ForeignKeyId,
    pub base: Reference,
    pub target: Reference,
}

impl ForeignKey {
    pub fn is_self_referential(&self) -> bool {
        self.base.table_id == self.target.table_id
    }

    /// Traverse this foreign key starting at `table_id`, if it is one of its ends.
    pub fn link_from(&self, table_id: TableId) -> Option<Link> {
        if self.base.table_id == table_id {
            Some(Link::new(*self, LinkDirection::Forward))
        } else if self.target.table_id == table_id {
            Some(Link::new(*self, LinkDirection::Reverse))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkDirection {
    /// From the referencing table to the referenced table.
    Forward,
    Reverse,
}

/// A foreign key traversed in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Link {
    foreign_key: ForeignKey,
    direction: LinkDirection,
}

impl Link {
    pub fn new(foreign_key: ForeignKey, direction: LinkDirection) -> Self {
        Self {
            foreign_key,
            direction,
        }
    }

    pub fn get_start(&self) -> Reference {
        match self.direction {
            LinkDirection::Forward => self.foreign_key.base,
            LinkDirection::Reverse => self.foreign_key.target,
        }
    }

    pub fn get_end(&self) -> Reference {
        match self.direction {
            LinkDirection::Forward => self.foreign_key.target,
            LinkDirection::Reverse => self.foreign_key.base,
        }
    }

    pub fn get_direction(&self) -> LinkDirection {
        self.direction
    }

    pub fn get_foreign_key(&self) -> &ForeignKey {
        &self.foreign_key
    }

    pub fn get_foreign_key_id(&self) -> ForeignKeyId {
        self.foreign_key.id
    }
}

/// One entry in a table's adjacency list. Self-referential foreign keys appear once, with
/// `neighbor` equal to the table itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Adjacent {
    pub neighbor: TableId,
    pub foreign_key: ForeignKeyId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_direction() {
        let foreign_key = ForeignKey {
            id: 0,
            base: Reference::new(2, 1),
            target: Reference::new(0, 0),
        };
        let forward = foreign_key.link_from(2).unwrap();
        assert_eq!(forward.get_direction(), LinkDirection::Forward);
        assert_eq!(forward.get_start(), Reference::new(2, 1));
        assert_eq!(forward.get_end(), Reference::new(0, 0));

        let reverse = foreign_key.link_from(0).unwrap();
        assert_eq!(reverse.get_direction(), LinkDirection::Reverse);
        assert_eq!(reverse.get_start(), Reference::new(0, 0));
        assert_eq!(reverse.get_end(), Reference::new(2, 1));

        assert!(foreign_key.link_from(1).is_none());
        assert!(!foreign_key.is_self_referential());
    }
}

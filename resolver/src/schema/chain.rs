use std::collections::BTreeSet;

use super::{links::Link, schema::TableId};

#[derive(Debug, Clone, PartialEq, Eq)]
struct ChainStats {
    starting_table_id: TableId,
    ending_table_id: TableId,
    table_ids: BTreeSet<TableId>,
}

/// A series of one or more connected links that never visits the same table twice, along with
/// cached information about that series for the purpose of easy analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    links: Vec<Link>,
    stats: ChainStats,
}

impl Chain {
    pub fn try_new(link: Link) -> Result<Self, &'static str> {
        let starting_table_id = link.get_start().table_id;
        let ending_table_id = link.get_end().table_id;
        if starting_table_id == ending_table_id {
            return Err("Self-referential links cannot be part of a chain");
        }
        Ok(Self {
            links: Vec::from([link]),
            stats: ChainStats {
                starting_table_id,
                ending_table_id,
                table_ids: BTreeSet::from([starting_table_id, ending_table_id]),
            },
        })
    }

    /// Build a chain from links listed in travel order.
    pub fn try_from_links(links: impl IntoIterator<Item = Link>) -> Result<Self, &'static str> {
        let mut links = links.into_iter();
        let first = links.next().ok_or("A chain needs at least one link")?;
        let mut chain = Self::try_new(first)?;
        for link in links {
            chain.try_append(link)?;
        }
        Ok(chain)
    }

    // The number of links in the chain
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Tables strictly between the two ends.
    pub fn get_interior_table_ids(&self) -> BTreeSet<TableId> {
        let mut interior = self.stats.table_ids.clone();
        interior.remove(&self.stats.starting_table_id);
        interior.remove(&self.stats.ending_table_id);
        interior
    }

    /// Try to add a link to the end of this chain. If it was successfully added, then return
    /// `Ok(())`. If it can't be added, then return an error message.
    pub fn try_append(&mut self, link: Link) -> Result<(), &'static str> {
        let link_starting_table_id = link.get_start().table_id;
        let link_ending_table_id = link.get_end().table_id;
        if self.stats.ending_table_id != link_starting_table_id {
            return Err("Link does not connect to chain");
        }
        if self.stats.table_ids.contains(&link_ending_table_id) {
            return Err("Link would cause chain to intersect itself");
        }
        self.links.push(link);
        self.stats.ending_table_id = link_ending_table_id;
        self.stats.table_ids.insert(link_ending_table_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::links::{ForeignKey, LinkDirection, Reference};

    fn link(id: usize, from: TableId, to: TableId) -> Link {
        let foreign_key = ForeignKey {
            id,
            base: Reference::new(from, 0),
            target: Reference::new(to, 0),
        };
        Link::new(foreign_key, LinkDirection::Forward)
    }

    #[test]
    fn test_chain() {
        let mut chain = Chain::try_new(link(0, 1, 2)).unwrap();
        assert!(chain.try_append(link(1, 2, 3)).is_ok());
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.get_interior_table_ids(), BTreeSet::from([2]));

        assert_eq!(
            chain.try_append(link(2, 1, 4)),
            Err("Link does not connect to chain")
        );
        assert_eq!(
            chain.try_append(link(3, 3, 1)),
            Err("Link would cause chain to intersect itself")
        );
        assert!(Chain::try_new(link(4, 5, 5)).is_err());
        assert!(Chain::try_from_links(Vec::new()).is_err());
        assert_eq!(
            Chain::try_from_links([link(0, 1, 2), link(1, 2, 3)]),
            Ok(chain)
        );
    }
}

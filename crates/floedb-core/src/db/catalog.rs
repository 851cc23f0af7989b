//! Module: catalog — runtime namespace registry.
//!
//! Responsibility: namespace descriptors, their index stores, and the
//! stable-memory regions backing them. Partitioned namespaces materialize
//! one child namespace per partition.
//! Boundary: cursors borrow descriptors from here; the catalog always
//! outlives the cursors it serves.

use crate::{
    MAX_INDEX_FIELDS,
    db::{
        index::{key::IndexKey, ordering::Ordering},
        store::{IndexStore, RawRow},
    },
    error::InternalError,
    key::Key,
    model::index::IndexModel,
};
use canic_cdk::structures::{
    DefaultMemoryImpl,
    memory::{MemoryId, MemoryManager, VirtualMemory},
};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

// MemoryId 255 is reserved by the memory manager itself
const MAX_MEMORY_REGIONS: u8 = 255;

///
/// CatalogError
///

#[derive(Debug, ThisError)]
pub enum CatalogError {
    #[error("namespace already exists: {name}")]
    NamespaceExists { name: String },

    #[error("namespace not found: {name}")]
    NamespaceNotFound { name: String },

    #[error("index already exists: {namespace}.{index}")]
    IndexExists { namespace: String, index: String },

    #[error("index {index} has an invalid field count: {len}")]
    InvalidFieldCount { index: String, len: usize },

    #[error("a partitioned namespace needs at least one partition: {name}")]
    NoPartitions { name: String },

    #[error("no stable-memory regions left")]
    OutOfMemoryRegions,
}

impl From<CatalogError> for InternalError {
    fn from(err: CatalogError) -> Self {
        match &err {
            CatalogError::NamespaceNotFound { .. } => Self::catalog_not_found(err.to_string()),
            _ => Self::new(
                crate::error::ErrorClass::Internal,
                crate::error::ErrorOrigin::Catalog,
                err.to_string(),
            ),
        }
    }
}

///
/// Catalog
///

pub struct Catalog {
    memory: MemoryManager<DefaultMemoryImpl>,
    next_memory_id: u8,
    namespaces: BTreeMap<String, Namespace>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self {
            memory: MemoryManager::init(DefaultMemoryImpl::default()),
            next_memory_id: 0,
            namespaces: BTreeMap::new(),
        }
    }

    /// Name of partition `n` of a partitioned namespace.
    #[must_use]
    pub fn partition_namespace(name: &str, partition: u32) -> String {
        format!("{name}.${partition}")
    }

    /// Register a plain namespace with the given primary-key index.
    pub fn create_namespace(&mut self, name: &str, pk: IndexModel) -> Result<(), CatalogError> {
        self.create_namespace_inner(name, pk, None)
    }

    /// Register a partitioned namespace and materialize its partitions.
    ///
    /// The parent holds the descriptor; rows live in the numbered partition
    /// namespaces.
    pub fn create_partitioned_namespace(
        &mut self,
        name: &str,
        pk: IndexModel,
        partitions: u32,
    ) -> Result<(), CatalogError> {
        if partitions == 0 {
            return Err(CatalogError::NoPartitions {
                name: name.to_string(),
            });
        }

        self.create_namespace_inner(name, pk, Some(partitions))?;
        for n in 0..partitions {
            self.create_namespace_inner(&Self::partition_namespace(name, n), pk, None)?;
        }

        Ok(())
    }

    /// Register a secondary index on an existing namespace.
    pub fn create_index(
        &mut self,
        namespace: &str,
        model: IndexModel,
        multi_key: bool,
    ) -> Result<(), CatalogError> {
        validate_fields(&model)?;

        let Some(ns) = self.namespaces.get(namespace) else {
            return Err(CatalogError::NamespaceNotFound {
                name: namespace.to_string(),
            });
        };
        if ns.find_index(model.name).is_some() {
            return Err(CatalogError::IndexExists {
                namespace: namespace.to_string(),
                index: model.name.to_string(),
            });
        }

        let memory = self.alloc_memory()?;
        let Some(ns) = self.namespaces.get_mut(namespace) else {
            return Err(CatalogError::NamespaceNotFound {
                name: namespace.to_string(),
            });
        };
        ns.secondaries
            .push(IndexDetails::new(model, multi_key, memory));

        Ok(())
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.get(name)
    }

    #[must_use]
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Namespace> {
        self.namespaces.get_mut(name)
    }

    fn create_namespace_inner(
        &mut self,
        name: &str,
        pk: IndexModel,
        partitions: Option<u32>,
    ) -> Result<(), CatalogError> {
        validate_fields(&pk)?;
        if self.namespaces.contains_key(name) {
            return Err(CatalogError::NamespaceExists {
                name: name.to_string(),
            });
        }

        let memory = self.alloc_memory()?;
        self.namespaces.insert(
            name.to_string(),
            Namespace {
                name: name.to_string(),
                partitions,
                pk: IndexDetails::new(pk, false, memory),
                secondaries: Vec::new(),
            },
        );

        Ok(())
    }

    fn alloc_memory(&mut self) -> Result<VirtualMemory<DefaultMemoryImpl>, CatalogError> {
        if self.next_memory_id >= MAX_MEMORY_REGIONS {
            return Err(CatalogError::OutOfMemoryRegions);
        }

        let id = self.next_memory_id;
        self.next_memory_id += 1;

        Ok(self.memory.get(MemoryId::new(id)))
    }
}

fn validate_fields(model: &IndexModel) -> Result<(), CatalogError> {
    if model.is_empty() || model.len() > MAX_INDEX_FIELDS {
        return Err(CatalogError::InvalidFieldCount {
            index: model.name.to_string(),
            len: model.len(),
        });
    }

    Ok(())
}

///
/// Namespace
///
/// Runtime descriptor of one namespace: its primary-key index, secondary
/// indexes, and partitioning. Cursors hold a non-owning borrow of this.
///

pub struct Namespace {
    name: String,
    partitions: Option<u32>,
    pk: IndexDetails,
    secondaries: Vec<IndexDetails>,
}

impl Namespace {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn partitioned(&self) -> bool {
        self.partitions.is_some()
    }

    #[must_use]
    pub const fn partition_count(&self) -> Option<u32> {
        self.partitions
    }

    #[must_use]
    pub const fn pk_index(&self) -> &IndexDetails {
        &self.pk
    }

    #[must_use]
    pub fn find_index(&self, name: &str) -> Option<&IndexDetails> {
        self.secondaries.iter().find(|idx| idx.model.name == name)
    }

    /// Insert a row into the primary-key index.
    pub fn insert_row(&mut self, pk: Key, row: RawRow) -> Result<(), InternalError> {
        let key = IndexKey::for_primary(pk);
        self.pk.insert(&key, row)
    }

    /// Insert an entry into a named secondary index.
    pub fn insert_index_entry(
        &mut self,
        index: &str,
        key: &IndexKey,
        row: RawRow,
    ) -> Result<(), InternalError> {
        let Some(details) = self
            .secondaries
            .iter_mut()
            .find(|idx| idx.model.name == index)
        else {
            return Err(InternalError::catalog_not_found(format!(
                "index not found: {}.{index}",
                self.name
            )));
        };

        details.insert(key, row)
    }
}

///
/// IndexDetails
///
/// One registered index: its static model, derived ordering, multi-key
/// flag, and the store holding its entries.
///

pub struct IndexDetails {
    model: IndexModel,
    ordering: Ordering,
    multi_key: bool,
    store: IndexStore,
}

impl IndexDetails {
    fn new(model: IndexModel, multi_key: bool, memory: VirtualMemory<DefaultMemoryImpl>) -> Self {
        Self {
            model,
            ordering: Ordering::new(model.fields),
            multi_key,
            store: IndexStore::init(memory),
        }
    }

    #[must_use]
    pub const fn model(&self) -> &IndexModel {
        &self.model
    }

    #[must_use]
    pub const fn ordering(&self) -> &Ordering {
        &self.ordering
    }

    #[must_use]
    pub const fn multi_key(&self) -> bool {
        self.multi_key
    }

    #[must_use]
    pub const fn store(&self) -> &IndexStore {
        &self.store
    }

    /// Insert an entry key with its row payload.
    pub fn insert(&mut self, key: &IndexKey, row: RawRow) -> Result<(), InternalError> {
        if key.is_sentinel() {
            return Err(InternalError::index_invariant(format!(
                "sentinel keys cannot be stored in {}",
                self.model
            )));
        }

        self.store.insert(key.to_raw(&self.ordering), row);

        Ok(())
    }
}

///
/// TESTS
///

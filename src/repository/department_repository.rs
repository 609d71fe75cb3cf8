use async_trait::async_trait;
use chrono::Utc;

use crate::{
    domain::{Department, DepartmentInput},
    error::Result,
    repository::{Collection, DepartmentRepository, Resource},
    seed::defaults,
    store::Storage,
};

impl Resource for Department {
    const KEY: &'static str = "departments";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn defaults() -> Vec<Self> {
        defaults::departments()
    }
}

/// Departments are not referenced by teacher records, so deleting one never
/// cascades.
pub struct StoreDepartmentRepository {
    collection: Collection<Department>,
}

impl StoreDepartmentRepository {
    pub fn new(storage: Storage) -> Self {
        Self {
            collection: Collection::new(storage),
        }
    }
}

#[async_trait]
impl DepartmentRepository for StoreDepartmentRepository {
    async fn list(&self) -> Result<Vec<Department>> {
        self.collection.list_all().await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Department>> {
        self.collection.find(id).await
    }

    async fn create(&self, input: DepartmentInput) -> Result<Department> {
        input.validate()?;
        let now = Utc::now();

        let department = self
            .collection
            .insert(|id| Department::from_input(id, input, now))
            .await?;
        tracing::info!("Created department {}: {}", department.id, department.name);
        Ok(department)
    }

    async fn update(&self, id: &str, input: DepartmentInput) -> Result<Department> {
        input.validate()?;
        let now = Utc::now();

        let department = self
            .collection
            .replace(id, |current| {
                let mut updated = Department::from_input(current.id.clone(), input, current.created_at);
                updated.updated_at = now;
                Ok(updated)
            })
            .await?;
        tracing::info!("Updated department {}", department.id);
        Ok(department)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.collection.remove(id).await?;
        tracing::info!("Deleted department {}", id);
        Ok(())
    }
}

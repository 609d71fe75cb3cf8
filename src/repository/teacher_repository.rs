use async_trait::async_trait;
use chrono::Utc;

use crate::{
    domain::{Teacher, TeacherFilter, TeacherInput, TeacherStats, TeacherStatus},
    error::{AppError, Result},
    export,
    repository::{collection::next_id, Collection, Resource, TeacherRepository},
    seed::defaults,
    store::Storage,
};

impl Resource for Teacher {
    const KEY: &'static str = "teachers";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn defaults() -> Vec<Self> {
        defaults::teachers()
    }
}

pub struct StoreTeacherRepository {
    collection: Collection<Teacher>,
}

impl StoreTeacherRepository {
    pub fn new(storage: Storage) -> Self {
        Self {
            collection: Collection::new(storage),
        }
    }
}

#[async_trait]
impl TeacherRepository for StoreTeacherRepository {
    async fn list(&self) -> Result<Vec<Teacher>> {
        self.collection.list_all().await
    }

    async fn filter(&self, filter: &TeacherFilter) -> Result<Vec<Teacher>> {
        Ok(filter.apply(self.collection.list_all().await?))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Teacher>> {
        self.collection.find(id).await
    }

    async fn create(&self, input: TeacherInput) -> Result<Teacher> {
        input.validate()?;
        let now = Utc::now();

        let teacher = self
            .collection
            .insert(|id| Teacher::from_input(id, input, now))
            .await?;
        tracing::info!("Created teacher {}: {}", teacher.id, teacher.full_name());
        Ok(teacher)
    }

    async fn update(&self, id: &str, input: TeacherInput) -> Result<Teacher> {
        input.validate()?;
        let now = Utc::now();

        let teacher = self
            .collection
            .replace(id, |current| {
                let mut updated = Teacher::from_input(current.id.clone(), input, current.created_at);
                updated.updated_at = now;
                updated.extra = current.extra.clone();
                Ok(updated)
            })
            .await?;
        tracing::info!("Updated teacher {}", teacher.id);
        Ok(teacher)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.collection.remove(id).await?;
        tracing::info!("Deleted teacher {}", id);
        Ok(())
    }

    async fn transition(&self, id: &str, status: TeacherStatus) -> Result<Teacher> {
        let now = Utc::now();
        let teacher = self
            .collection
            .replace(id, |current| {
                if current.status == status {
                    return Err(AppError::InvalidTransition(format!(
                        "teacher is already {}",
                        status.as_str()
                    )));
                }
                let mut updated = current.clone();
                updated.status = status;
                updated.updated_at = now;
                Ok(updated)
            })
            .await?;
        tracing::info!("Teacher {} is now {}", teacher.id, status.as_str());
        Ok(teacher)
    }

    async fn stats(&self) -> Result<TeacherStats> {
        Ok(TeacherStats::from_slice(&self.collection.list_all().await?))
    }

    async fn import_json(&self, json: &str) -> Result<Vec<Teacher>> {
        let incoming: Vec<Teacher> = serde_json::from_str(json)
            .map_err(|e| AppError::Validation(format!("Invalid teacher import file: {}", e)))?;

        let now = Utc::now();
        let mut teachers = self.collection.list_all().await?;
        let mut imported = Vec::with_capacity(incoming.len());
        for mut teacher in incoming {
            if teacher.id.is_empty() || teachers.iter().any(|t| t.id == teacher.id) {
                teacher.id = next_id(&teachers, now);
            }
            teachers.push(teacher.clone());
            imported.push(teacher);
        }

        self.collection.save_all(&teachers).await?;
        tracing::info!("Imported {} teachers", imported.len());
        Ok(imported)
    }

    async fn export_json(&self) -> Result<String> {
        export::to_pretty_json(&self.collection.list_all().await?)
    }
}

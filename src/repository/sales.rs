//! Sales repository

use super::collection::{Collection, Record};
use crate::{
    error::{AppError, AppResult},
    models::sale::Sale,
};

impl Record for Sale {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Clone)]
pub struct SalesRepository {
    sales: Collection<Sale>,
}

impl SalesRepository {
    pub fn new(sales: Collection<Sale>) -> Self {
        Self { sales }
    }

    pub async fn list(&self) -> Vec<Sale> {
        self.sales.all().await
    }

    /// Every sale of a show, cancelled ones included
    pub async fn for_show(&self, show_id: &str) -> Vec<Sale> {
        self.sales.filter(|s| s.show_id == show_id).await
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Sale> {
        self.sales
            .find(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Sale with id {} not found", id)))
    }

    /// Store a fully built sale
    pub async fn create(&self, sale: Sale) -> AppResult<Sale> {
        self.sales.insert(sale.clone()).await?;
        Ok(sale)
    }

    pub async fn update<F>(&self, id: &str, f: F) -> AppResult<Sale>
    where
        F: FnOnce(&mut Sale),
    {
        self.sales
            .update(id, f)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Sale with id {} not found", id)))
    }

    /// Delete a sale and return the remaining sales
    pub async fn delete(&self, id: &str) -> AppResult<Vec<Sale>> {
        self.sales
            .remove(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Sale with id {} not found", id)))
    }

    pub async fn replace_all(&self, sales: Vec<Sale>) -> AppResult<Vec<Sale>> {
        self.sales.replace_all(sales).await
    }
}

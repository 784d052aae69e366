use crate::PostgresConverter;
use fluent_core::{Order, Ordered, QuerySort, Result, SortDirection};

pub trait SortStrategy: Send + Sync {
    fn convert_sort(&self, converter: &PostgresConverter, sort: &QuerySort) -> Result<Ordered>;
}

#[derive(Default, Debug, Clone, Copy)]
pub struct PostgresSortStrategy;

impl SortStrategy for PostgresSortStrategy {
    fn convert_sort(&self, converter: &PostgresConverter, sort: &QuerySort) -> Result<Ordered> {
        Ok(match sort {
            QuerySort::Sort { field, direction } => Ordered {
                expression: converter.convert_field(field)?,
                order: match direction {
                    SortDirection::Ascending => Order::ASC,
                    SortDirection::Descending => Order::DESC,
                    SortDirection::Custom(v) => Order::Custom(v.clone()),
                },
            },
            // Direction is part of the expression
            QuerySort::Custom(expression) => Ordered {
                expression: expression.clone(),
                order: Order::Custom(String::new()),
            },
        })
    }
}

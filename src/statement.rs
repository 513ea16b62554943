use crate::{decode::RowDecoder, Param};

/// SQL text with bound parameters and no expected row data.
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    /// SQL text.
    pub sql: String,
    /// Named statement parameters.
    pub params: Vec<Param>,
}

impl Statement {
    pub fn new<I>(sql: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = Param>,
    {
        Self {
            sql: sql.into(),
            params: params.into_iter().collect(),
        }
    }
}

/// SQL text with bound parameters and a decoder for the rows it returns.
#[derive(Clone, Debug)]
pub struct Query<T> {
    pub sql: String,
    pub params: Vec<Param>,
    pub decoder: RowDecoder<T>,
}

impl<T> Query<T> {
    pub fn new<I>(sql: impl Into<String>, params: I, decoder: RowDecoder<T>) -> Self
    where
        I: IntoIterator<Item = Param>,
    {
        Self {
            sql: sql.into(),
            params: params.into_iter().collect(),
            decoder,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{decode, encode, Query, Statement};

    #[test]
    fn statement_collects_params() {
        let stmt = Statement::new(
            "UPDATE users SET name = :name WHERE id = :id",
            [encode::text("name", "Kit"), encode::int("id", 1)],
        );
        assert_eq!(stmt.params.len(), 2);
        assert_eq!(stmt.params[1].name(), "id");
    }

    #[test]
    fn query_without_params() {
        let query = Query::new("SELECT COUNT(*) AS n FROM users", [], decode::int("n"));
        assert!(query.params.is_empty());
        assert_eq!(query.decoder.column(), Some("n"));
    }
}

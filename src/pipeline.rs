//! Pipeline request building and response decoding.
//!
//! Decoding runs in two steps. The envelope is first turned into one outcome
//! per submitted statement, with rows re-keyed by column name; each successful
//! outcome is then run through its statement's [`RowDecoder`]. A row that
//! fails to decode fails the whole call; partial results are never returned.

use serde_json::Value as JsonValue;

use crate::{
    decode::{Row, RowDecoder},
    wire::{self, ExecuteStatement, NamedArg},
    BatchResult, Column, Param, ResultSet, SqlError, StatementOutcome, TursoError,
};

pub(crate) fn build_execute_statement(
    sql: &str,
    params: &[Param],
    want_rows: bool,
) -> Result<ExecuteStatement, TursoError> {
    let named_args = params
        .iter()
        .map(|param| {
            Ok(NamedArg {
                name: normalize_named_parameter_name(param.name())?,
                value: param.to_wire(),
            })
        })
        .collect::<Result<Vec<_>, TursoError>>()?;

    Ok(ExecuteStatement {
        sql: sql.to_owned(),
        named_args,
        want_rows,
    })
}

fn normalize_named_parameter_name(name: &str) -> Result<String, TursoError> {
    let normalized = name.trim_start_matches([':', '@', '$']);
    if normalized.is_empty() {
        return Err(TursoError::Protocol(
            "named parameter name cannot be empty".to_owned(),
        ));
    }
    Ok(normalized.to_owned())
}

/// Decodes a raw pipeline response body, one decoder per submitted statement.
///
/// The response must carry exactly `decoders.len()` results.
pub fn decode_response<T: 'static>(
    body: &str,
    decoders: &[RowDecoder<T>],
) -> Result<BatchResult<Vec<T>>, TursoError> {
    let response = parse_response(body)?;
    let batch = decode_outcomes(response, decoders.len())?;
    decode_batch_rows(batch, decoders)
}

pub(crate) fn parse_response(body: &str) -> Result<wire::PipelineResponse, TursoError> {
    serde_json::from_str::<wire::PipelineResponse>(body).map_err(|err| {
        crate::TransportError::BadBody(format!(
            "invalid pipeline response JSON: {err}; body: {body}"
        ))
        .into()
    })
}

/// Splits the envelope into per-statement outcomes with name-keyed rows.
pub(crate) fn decode_outcomes(
    response: wire::PipelineResponse,
    expected: usize,
) -> Result<BatchResult<Vec<Row>>, TursoError> {
    if response.results.len() != expected {
        return Err(TursoError::Protocol(format!(
            "result count mismatch: expected {expected}, got {}",
            response.results.len()
        )));
    }

    let outcomes = response
        .results
        .into_iter()
        .enumerate()
        .map(|(request_index, result)| decode_statement_outcome(result, request_index))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BatchResult {
        baton: response.baton,
        base_url: response.base_url,
        outcomes,
    })
}

pub(crate) fn decode_batch_rows<T: 'static>(
    batch: BatchResult<Vec<Row>>,
    decoders: &[RowDecoder<T>],
) -> Result<BatchResult<Vec<T>>, TursoError> {
    let outcomes = batch
        .outcomes
        .into_iter()
        .zip(decoders)
        .enumerate()
        .map(|(request_index, (outcome, decoder))| {
            outcome.try_map_result(|result| decode_result_rows(result, decoder, request_index))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BatchResult {
        baton: batch.baton,
        base_url: batch.base_url,
        outcomes,
    })
}

pub(crate) fn decode_result_rows<T: 'static>(
    result: ResultSet<Vec<Row>>,
    decoder: &RowDecoder<T>,
    request_index: usize,
) -> Result<ResultSet<Vec<T>>, TursoError> {
    result.try_map(|rows| decode_rows(&rows, decoder, request_index))
}

fn decode_rows<T: 'static>(
    rows: &[Row],
    decoder: &RowDecoder<T>,
    request_index: usize,
) -> Result<Vec<T>, TursoError> {
    rows.iter()
        .enumerate()
        .map(|(row_index, row)| {
            decoder
                .decode(row)
                .map_err(|source| TursoError::RowDecode {
                    request_index,
                    row_index,
                    source,
                })
        })
        .collect()
}

fn decode_statement_outcome(
    result: wire::PipelineResult,
    request_index: usize,
) -> Result<StatementOutcome<Vec<Row>>, TursoError> {
    match result.kind.as_str() {
        "ok" => {
            let response = result.response.ok_or_else(|| {
                TursoError::Protocol(format!(
                    "missing response payload for request {request_index}"
                ))
            })?;
            if response.kind != "execute" {
                return Err(TursoError::Protocol(format!(
                    "expected execute response at request {request_index}, got '{}'",
                    response.kind
                )));
            }
            let result = response.result.ok_or_else(|| {
                TursoError::Protocol(format!(
                    "missing execute result payload at request {request_index}"
                ))
            })?;
            decode_execute_result(result, request_index).map(StatementOutcome::Success)
        }
        "error" => {
            let error = result.error.ok_or_else(|| {
                TursoError::Protocol(format!(
                    "missing error payload for request {request_index}"
                ))
            })?;
            let classified = SqlError::classify(error.code.as_deref(), &error.message);

            #[cfg(feature = "tracing")]
            tracing::warn!(
                request_index,
                code = error.code.as_deref().unwrap_or("<none>"),
                engine_message = %error.message,
                "statement failed"
            );

            Ok(StatementOutcome::Failed {
                request_index,
                error: classified,
                message: error.message,
            })
        }
        other => Err(TursoError::Protocol(format!(
            "unknown pipeline result type '{other}' at request {request_index}"
        ))),
    }
}

fn decode_execute_result(
    result: wire::ExecuteResult,
    request_index: usize,
) -> Result<ResultSet<Vec<Row>>, TursoError> {
    let columns: Vec<Column> = result
        .cols
        .into_iter()
        .map(|col| Column {
            name: col.name.unwrap_or_default(),
            decltype: col.decltype,
        })
        .collect();

    let rows = result
        .rows
        .into_iter()
        .enumerate()
        .map(|(row_index, cells)| rekey_row(&columns, cells, request_index, row_index))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ResultSet {
        columns,
        data: rows,
        affected_row_count: result.affected_row_count,
        last_insert_rowid: result.last_insert_rowid,
    })
}

/// Zips positional cells with their columns into a name-keyed row.
///
/// With duplicate column names the rightmost cell wins.
fn rekey_row(
    columns: &[Column],
    cells: Vec<wire::Cell>,
    request_index: usize,
    row_index: usize,
) -> Result<Row, TursoError> {
    if cells.len() != columns.len() {
        return Err(TursoError::Protocol(format!(
            "row {row_index} of request {request_index} has {} cells for {} columns",
            cells.len(),
            columns.len()
        )));
    }

    Ok(columns
        .iter()
        .zip(cells)
        .map(|(column, cell)| (column.name.clone(), cell_value(cell)))
        .collect())
}

fn cell_value(cell: wire::Cell) -> JsonValue {
    match cell.kind.as_str() {
        "null" => JsonValue::Null,
        "blob" => cell.base64.map(JsonValue::String).unwrap_or(cell.value),
        _ => cell.value,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{decode, encode, pipeline, SqlError, StatementOutcome, TursoError};

    fn users_body() -> String {
        json!({
            "baton": "b-1",
            "base_url": null,
            "results": [{
                "type": "ok",
                "response": {
                    "type": "execute",
                    "result": {
                        "cols": [
                            { "name": "id", "decltype": "INTEGER" },
                            { "name": "name", "decltype": "TEXT" },
                            { "name": "avatar", "decltype": "BLOB" }
                        ],
                        "rows": [
                            [
                                { "type": "integer", "value": "1" },
                                { "type": "text", "value": "Kit" },
                                { "type": "blob", "base64": "AQID" }
                            ],
                            [
                                { "type": "integer", "value": 2 },
                                { "type": "text", "value": "Ada" },
                                { "type": "null" }
                            ]
                        ],
                        "affected_row_count": 0,
                        "last_insert_rowid": null
                    }
                }
            }]
        })
        .to_string()
    }

    #[test]
    fn build_strips_placeholder_prefix() {
        let stmt = pipeline::build_execute_statement(
            "SELECT :name",
            &[encode::text(":name", "kit")],
            true,
        )
        .expect("must build statement");
        assert_eq!(stmt.named_args[0].name, "name");
        assert!(stmt.want_rows);
    }

    #[test]
    fn build_rejects_empty_parameter_name() {
        let err = pipeline::build_execute_statement("SELECT 1", &[encode::int("$", 1)], true)
            .expect_err("must fail");
        assert!(matches!(err, TursoError::Protocol(_)));
    }

    #[test]
    fn decodes_rows_by_column_name() {
        let decoder = decode::map3(
            |id, name, avatar| (id, name, avatar),
            decode::int("id"),
            decode::string("name"),
            decode::maybe(decode::string, "avatar"),
        );
        let batch = pipeline::decode_response(&users_body(), &[decoder]).expect("must decode");

        assert_eq!(batch.baton.as_deref(), Some("b-1"));
        let result = match &batch.outcomes[0] {
            StatementOutcome::Success(result) => result,
            other => panic!("expected success, got {other:?}"),
        };
        assert_eq!(result.columns.len(), 3);
        assert_eq!(
            result.data,
            vec![
                (1, "Kit".to_owned(), Some("AQID".to_owned())),
                (2, "Ada".to_owned(), None),
            ]
        );
    }

    #[test]
    fn any_row_failure_fails_the_call() {
        let err = pipeline::decode_response(&users_body(), &[decode::int("name")])
            .expect_err("must fail");
        assert!(matches!(
            err,
            TursoError::RowDecode {
                request_index: 0,
                row_index: 0,
                ..
            }
        ));
    }

    #[test]
    fn zero_rows_is_a_success() {
        let body = json!({
            "results": [{
                "type": "ok",
                "response": {
                    "type": "execute",
                    "result": { "cols": [{ "name": "id" }], "rows": [], "affected_row_count": 0 }
                }
            }]
        })
        .to_string();
        let batch = pipeline::decode_response(&body, &[decode::int("id")]).expect("must decode");
        assert_eq!(
            batch.outcomes[0].clone().into_result().expect("success").data,
            Vec::<i64>::new()
        );
    }

    #[test]
    fn short_result_array_is_rejected() {
        let err = pipeline::decode_response(&users_body(), &[decode::int("id"), decode::int("id")])
            .expect_err("must fail");
        assert!(matches!(err, TursoError::Protocol(_)));
    }

    #[test]
    fn error_outcome_is_classified_without_touching_rows() {
        let body = json!({
            "results": [{
                "type": "error",
                "error": { "message": "near \"SELEC\": syntax error", "code": "SQL_PARSE_ERROR" }
            }]
        })
        .to_string();
        let batch = pipeline::decode_response(&body, &[decode::fail::<i64>("never run")])
            .expect("must decode");
        assert_eq!(
            batch.outcomes[0],
            StatementOutcome::Failed {
                request_index: 0,
                error: SqlError::SqlParseError,
                message: "near \"SELEC\": syntax error".to_owned(),
            }
        );
    }

    #[test]
    fn cell_count_mismatch_is_a_protocol_error() {
        let body = json!({
            "results": [{
                "type": "ok",
                "response": {
                    "type": "execute",
                    "result": {
                        "cols": [{ "name": "a" }, { "name": "b" }],
                        "rows": [[{ "type": "integer", "value": "1" }]],
                        "affected_row_count": 0
                    }
                }
            }]
        })
        .to_string();
        let err = pipeline::decode_response(&body, &[decode::int("a")]).expect_err("must fail");
        assert!(matches!(err, TursoError::Protocol(_)));
    }

    #[test]
    fn malformed_envelope_is_a_transport_error() {
        let err = pipeline::decode_response("{\"nope\": 1}", &[decode::int("a")])
            .expect_err("must fail");
        assert!(matches!(
            err,
            TursoError::Transport(crate::TransportError::BadBody(_))
        ));
    }

    #[test]
    fn unknown_result_type_is_rejected() {
        let body = json!({ "results": [{ "type": "maybe" }] }).to_string();
        let err = pipeline::decode_response(&body, &[decode::int("a")]).expect_err("must fail");
        assert!(matches!(err, TursoError::Protocol(_)));
    }
}

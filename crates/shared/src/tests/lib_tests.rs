use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;

use crate::{
    domain::{EntryId, EntryKind, EntrySummary, Person, PersonId},
    error::{extract_message, ApiError, ErrorCode},
    protocol::{EntrySearchQuery, Page, PersonSearchQuery, SortDirection, SortSpec},
};

#[test]
fn decodes_entry_summary_page_from_backend_json() {
    let body = json!({
        "content": [{
            "codigo": 2,
            "descricao": "Café",
            "dataVencimento": "2017-06-10",
            "dataPagamento": null,
            "valor": 8,
            "tipoLancamento": "DESPESA",
            "categoria": "Alimentação",
            "pessoa": "Josué Mariano"
        }],
        "totalElements": 1,
        "number": 0,
        "size": 5
    });

    let page: Page<EntrySummary> = serde_json::from_value(body).expect("decode page");
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.number, 0);
    assert_eq!(page.size, Some(5));
    let entry = &page.content[0];
    assert_eq!(entry.id, EntryId(2));
    assert_eq!(entry.kind, EntryKind::Despesa);
    assert_eq!(entry.amount, Decimal::new(8, 0));
    assert_eq!(entry.due_date, NaiveDate::from_ymd_opt(2017, 6, 10).expect("date"));
    assert!(entry.payment_date.is_none());
}

#[test]
fn person_without_address_or_status_defaults_to_active_and_empty_address() {
    let person: Person =
        serde_json::from_value(json!({ "codigo": 9, "nome": "Maria Rita" })).expect("decode");
    assert_eq!(person.id, Some(PersonId(9)));
    assert!(person.active);
    assert!(person.address.street.is_none());
}

#[test]
fn new_person_serializes_without_identity() {
    let person = Person {
        id: None,
        name: "Pedro Santos".into(),
        active: true,
        address: Default::default(),
    };
    let value = serde_json::to_value(&person).expect("encode");
    assert!(value.get("codigo").is_none());
    assert_eq!(value["nome"], "Pedro Santos");
    assert_eq!(value["ativo"], true);
}

#[test]
fn blank_filters_are_absent_from_the_query() {
    let query = EntrySearchQuery {
        descricao: None,
        due_from: NaiveDate::from_ymd_opt(2024, 1, 31),
        due_to: None,
        page: 0,
        size: 5,
        sort: "dataVencimento,asc".into(),
    };
    let value = serde_json::to_value(&query).expect("encode");
    assert!(value.get("descricao").is_none());
    assert!(value.get("dataVencimentoAte").is_none());
    assert_eq!(value["dataVencimentoDe"], "2024-01-31");

    let query = PersonSearchQuery {
        nome: None,
        page: 2,
        size: 10,
        sort: "nome,asc".into(),
    };
    let value = serde_json::to_value(&query).expect("encode");
    assert!(value.get("nome").is_none());
    assert_eq!(value["page"], 2);
}

#[test]
fn sort_spec_parses_and_renders_wire_format() {
    let spec = SortSpec::parse("valor,desc").expect("parse");
    assert_eq!(spec.field, "valor");
    assert_eq!(spec.direction, SortDirection::Desc);
    assert_eq!(spec.to_string(), "valor,desc");
    assert_eq!(SortSpec::parse("nome").expect("parse").to_string(), "nome,asc");
    assert!(SortSpec::parse("nome,sideways").is_none());
    assert!(SortSpec::parse(" ,asc").is_none());
}

#[test]
fn extracts_backend_user_message_from_error_list() {
    let body = r#"[{"mensagemUsuario":"Operação não permitida","mensagemDesenvolvedor":"FK violation"}]"#;
    assert_eq!(
        extract_message(body).as_deref(),
        Some("Operação não permitida")
    );
}

#[test]
fn extracts_message_from_object_or_plain_text() {
    assert_eq!(
        extract_message(r#"{"message":"Pessoa inexistente"}"#).as_deref(),
        Some("Pessoa inexistente")
    );
    assert_eq!(extract_message("gateway down").as_deref(), Some("gateway down"));
    assert_eq!(extract_message("  "), None);
    assert_eq!(extract_message(r#"{"unrelated":1}"#), None);
}

#[test]
fn api_error_classifies_status_codes() {
    let err = ApiError::from_body(401, "");
    assert_eq!(err.code, ErrorCode::Unauthorized);
    assert!(err.code.is_auth());
    assert_eq!(err.message, "HTTP 401");

    assert_eq!(ApiError::new(404, "x").code, ErrorCode::NotFound);
    assert_eq!(ApiError::new(422, "x").code, ErrorCode::Validation);
    assert_eq!(ApiError::new(503, "x").code, ErrorCode::Internal);
}

//! Queue-owning print service

mod common;

use std::time::Duration;

use common::FakeGateway;
use shared::Draft;
use tag_station::printing::ServiceResult;
use tag_station::{
    DispatchOptions, LabelPrintService, PendingQueue, PrintExecutor, PrintOutcome, QueueStorage,
    ServiceError,
};

fn service(gateway: &FakeGateway) -> LabelPrintService<&FakeGateway> {
    let executor = PrintExecutor::new(gateway).with_options(DispatchOptions {
        pacing: Duration::ZERO,
        send_timeout: None,
    });
    let storage = QueueStorage::open_in_memory().unwrap();
    LabelPrintService::new(executor, PendingQueue::with_storage(storage).unwrap())
}

fn draft(name: &str, price: &str) -> Draft {
    Draft {
        product_name: name.to_string(),
        price: price.to_string(),
        ..Draft::new()
    }
}

fn queue_names(service: &LabelPrintService<&FakeGateway>) -> Vec<String> {
    service
        .labels()
        .iter()
        .map(|l| shared::LabelContent::product_name(l).to_string())
        .collect()
}

#[tokio::test]
async fn test_success_clears_queue() {
    let gateway = FakeGateway::new();
    let service = service(&gateway);
    service.add(&draft("Apple", "1.00")).unwrap();
    service.add(&draft("Banana", "2.00")).unwrap();

    let outcome = service.print_pending().await.unwrap();

    assert_eq!(outcome, PrintOutcome::Succeeded { printed: 2 });
    assert!(service.labels().is_empty());
    assert!(!service.is_printing());
}

#[tokio::test]
async fn test_failure_keeps_queue_and_resume_finishes() {
    let gateway = FakeGateway::new().fail_on("Banana");
    let service = service(&gateway);
    service.add(&draft("Apple", "1.00")).unwrap();
    service.add(&draft("Banana", "2.00")).unwrap();
    service.add(&draft("Cherry", "3.00")).unwrap();

    let outcome = service.print_pending().await.unwrap();
    assert!(matches!(
        outcome,
        PrintOutcome::PartialFailure {
            printed: 1,
            failed_index: 1,
            total: 3,
            ..
        }
    ));
    assert_eq!(queue_names(&service), ["Apple", "Banana", "Cherry"]);

    gateway.set_fail_on(None);
    let outcome = service.print_from(1).await.unwrap();

    // Indices are relative to the whole queue
    assert_eq!(outcome, PrintOutcome::Succeeded { printed: 3 });
    assert!(service.labels().is_empty());

    // Apple went out once; Banana was attempted twice
    let sent = gateway.sent();
    assert_eq!(sent.iter().filter(|s| s.contains("Apple")).count(), 1);
    assert_eq!(sent.iter().filter(|s| s.contains("Banana")).count(), 2);
}

#[tokio::test]
async fn test_resume_failure_reports_queue_index() {
    let gateway = FakeGateway::new().fail_on("Cherry");
    let service = service(&gateway);
    service.add(&draft("Apple", "1.00")).unwrap();
    service.add(&draft("Banana", "2.00")).unwrap();
    service.add(&draft("Cherry", "3.00")).unwrap();

    let outcome = service.print_from(1).await.unwrap();

    assert!(matches!(
        outcome,
        PrintOutcome::PartialFailure {
            printed: 2,
            failed_index: 2,
            total: 3,
            ..
        }
    ));
}

#[tokio::test]
async fn test_resume_past_end_is_rejected() {
    let gateway = FakeGateway::new();
    let service = service(&gateway);
    service.add(&draft("Apple", "1.00")).unwrap();

    let err = service.print_from(1).await.unwrap_err();

    assert!(matches!(
        err,
        ServiceError::InvalidResumeIndex { start: 1, len: 1 }
    ));
    assert!(gateway.sent().is_empty());
}

#[tokio::test]
async fn test_second_batch_is_refused_while_printing() {
    let gateway = FakeGateway::gated();
    let service = service(&gateway);
    service.add(&draft("Apple", "1.00")).unwrap();

    let first = service.print_pending();
    let second = async {
        gateway.entered.notified().await;
        assert!(service.is_printing());
        let refused: ServiceResult<PrintOutcome> = service.print_pending().await;
        gateway.release.notify_one();
        refused
    };
    let (first, second) = tokio::join!(first, second);

    assert_eq!(first.unwrap(), PrintOutcome::Succeeded { printed: 1 });
    assert!(matches!(second, Err(ServiceError::AlreadyPrinting)));
    assert!(!service.is_printing());
}

#[tokio::test]
async fn test_labels_added_during_batch_survive() {
    let gateway = FakeGateway::gated();
    let service = service(&gateway);
    service.add(&draft("Apple", "1.00")).unwrap();

    let batch = service.print_pending();
    let late = async {
        gateway.entered.notified().await;
        service.add(&draft("Late", "9.00")).unwrap();
        gateway.release.notify_one();
    };
    let (outcome, _) = tokio::join!(batch, late);

    assert_eq!(outcome.unwrap(), PrintOutcome::Succeeded { printed: 1 });
    assert_eq!(queue_names(&service), ["Late"]);
}

#[tokio::test]
async fn test_remove_and_edit_by_id() {
    let gateway = FakeGateway::new();
    let service = service(&gateway);
    let apple = service.add(&draft("Apple", "1.00")).unwrap();
    let banana = service.add(&draft("Apple", "1.00")).unwrap();
    service.add(&draft("Cherry", "3.00")).unwrap();

    // Identical content, only the named record goes
    service.remove(apple.id()).unwrap();
    assert_eq!(queue_names(&service), ["Apple", "Cherry"]);
    assert_eq!(service.labels()[0].id(), banana.id());

    let form = service.edit(banana.id()).unwrap();
    assert_eq!(form.product_name, "Apple");
    assert_eq!(form.price, "1.00");
    assert_eq!(queue_names(&service), ["Cherry"]);

    assert!(matches!(
        service.remove(banana.id()),
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_replace_swaps_record_in_one_step() {
    let gateway = FakeGateway::new();
    let service = service(&gateway);
    let apple = service.add(&draft("Apple", "1.00")).unwrap();
    service.add(&draft("Banana", "2.00")).unwrap();

    // Rejected edit leaves the original queued
    assert!(matches!(
        service.replace(apple.id(), &draft("Apple", "-1")),
        Err(ServiceError::Label(_))
    ));
    assert_eq!(queue_names(&service), ["Apple", "Banana"]);

    // Edited record moves to the end under a new id
    let edited = service.replace(apple.id(), &draft("Green Apple", "1.25")).unwrap();
    assert_ne!(edited.id(), apple.id());
    assert_eq!(queue_names(&service), ["Banana", "Green Apple"]);
    assert!(matches!(
        service.get(apple.id()),
        Err(ServiceError::NotFound(_))
    ));

    // Unknown id adds nothing
    assert!(matches!(
        service.replace(apple.id(), &draft("Ghost", "1.00")),
        Err(ServiceError::NotFound(_))
    ));
    assert_eq!(service.labels().len(), 2);
}

#[tokio::test]
async fn test_invalid_draft_is_rejected() {
    let gateway = FakeGateway::new();
    let service = service(&gateway);

    assert!(matches!(
        service.add(&draft("", "1.00")),
        Err(ServiceError::Label(_))
    ));
    assert!(matches!(
        service.add(&draft("Apple", "0")),
        Err(ServiceError::Label(_))
    ));
    assert!(matches!(
        service.add(&draft("Apple", "abc")),
        Err(ServiceError::Label(_))
    ));
    assert!(service.labels().is_empty());
}

#[tokio::test]
async fn test_zpl_matches_what_is_sent() {
    let gateway = FakeGateway::new();
    let service = service(&gateway);
    let label = service.add(&draft("Widget", "9.99")).unwrap();

    let zpl = service.zpl_for(label.id()).unwrap();
    assert!(zpl.starts_with("^XA"));
    assert!(zpl.contains("$9.99"));

    service.print_pending().await.unwrap();
    assert_eq!(gateway.sent(), vec![zpl]);
}

#[tokio::test]
async fn test_preview_needs_name_or_price() {
    let gateway = FakeGateway::new();
    let service = service(&gateway);

    assert!(service.preview(&Draft::new()).is_none());
    let preview = service.preview(&draft("", "5")).unwrap();
    assert!(preview.contains("Product Name"));
}

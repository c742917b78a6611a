/// Benchmarks for navigation tree redaction
///
/// Measures performance of:
/// - Redacting trees of increasing width for anonymous and member callers
/// - Serializing a redacted tree to JSON

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mithlond_authz::{AuthorizationPath, PermissionSet};
use mithlond_navigation::{Menu, NavNode, Redactor};

fn build_tree(menus: usize, items_per_menu: usize) -> Menu {
    let mut root = NavNode::menu().with_dom_id("root");
    for m in 0..menus {
        let mut menu = NavNode::menu()
            .with_dom_id(format!("menu{}", m))
            .with_authorization_patterns(if m % 2 == 0 { "" } else { "/mithlond" });
        for i in 0..items_per_menu {
            let patterns = match i % 3 {
                0 => "",
                1 => "/mithlond/members,/forodrim/members",
                _ => "/mithlond/council",
            };
            menu = menu.with_child(
                NavNode::menu_item()
                    .with_dom_id(format!("item{}_{}", m, i))
                    .with_href(format!("page{}_{}", m, i))
                    .with_icon("calendar")
                    .with_authorization_patterns(patterns)
                    .build()
                    .unwrap(),
            );
        }
        root = root.with_child(menu.build().unwrap()).with_child(NavNode::separator());
    }
    root.build_menu().unwrap()
}

fn bench_redaction(c: &mut Criterion) {
    let mut group = c.benchmark_group("redaction");

    let anonymous = PermissionSet::new();
    let member = AuthorizationPath::parse_concatenated(
        "/forodrim/members/village_idiots,/mithlond/council/chair",
    )
    .unwrap();

    for width in [4, 16, 64] {
        let template = build_tree(width, 8);

        group.bench_with_input(BenchmarkId::new("anonymous", width), &template, |b, t| {
            b.iter(|| Redactor::new(black_box(&anonymous)).redact_menu(t));
        });

        group.bench_with_input(BenchmarkId::new("member", width), &template, |b, t| {
            b.iter(|| Redactor::new(black_box(&member)).redact_menu(t));
        });
    }

    group.finish();
}

fn bench_serialization(c: &mut Criterion) {
    let member = AuthorizationPath::parse_concatenated("/mithlond/members").unwrap();
    let redacted = Redactor::new(&member).redact_menu(&build_tree(16, 8));

    c.bench_function("serialize_redacted_tree", |b| {
        b.iter(|| serde_json::to_string(black_box(&redacted)).unwrap());
    });
}

criterion_group!(benches, bench_redaction, bench_serialization);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use restconf::{request::Request, restconf::build_router};

fn dispatch_benchmark(c: &mut Criterion) {
    let router = build_router("/restconf").unwrap();
    let mut group = c.benchmark_group("dispatch");

    let requests = [
        (
            "host_meta",
            "GET /.well-known/host-meta HTTP/1.1\r\nAccept: application/xrd+xml\r\n\r\n",
        ),
        (
            "root_json",
            "GET /restconf HTTP/1.1\r\nAccept: application/yang-data+json\r\n\r\n",
        ),
        (
            "root_xml",
            "GET /restconf HTTP/1.1\r\nAccept: application/yang-data+xml\r\n\r\n",
        ),
        (
            "prefix_fallback",
            "GET /restconf/yang-library-version/extra HTTP/1.1\r\nAccept: application/yang-data+json\r\n\r\n",
        ),
        ("not_found", "GET /missing HTTP/1.1\r\n\r\n"),
    ];

    for (name, raw) in requests.iter() {
        let request = Request::try_from(raw.as_bytes(), 0).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(name), &request, |b, request| {
            b.iter(|| black_box(router.dispatch(request).as_bytes()));
        });
    }

    group.finish();
}

fn resolve_benchmark(c: &mut Criterion) {
    let router = build_router("/restconf").unwrap();

    c.bench_function("resolve_longest_prefix", |b| {
        b.iter(|| router.resolve(black_box("/restconf/data/a/b/c/d")));
    });
}

criterion_group!(benches, dispatch_benchmark, resolve_benchmark);
criterion_main!(benches);

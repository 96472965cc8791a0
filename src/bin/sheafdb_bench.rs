use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use SheafDB::store::DocStore;

/// Детерминированный PRNG (xorshift64*), хватает для бенча.
/// Нулевое зерно подменяется константой: xorshift в нуле вырождается.
struct XorShift64 {
    state: u64,
}
impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }
    #[inline]
    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }
    #[inline]
    fn below(&mut self, bound: u64) -> u64 {
        self.next_u64() % bound.max(1)
    }
}

/// Прогресс фазы, примерно десять строк на фазу.
struct Progress<'a> {
    label: &'a str,
    total: usize,
    every: usize,
    start: Instant,
    enabled: bool,
}
impl<'a> Progress<'a> {
    fn new(label: &'a str, total: usize, enabled: bool) -> Self {
        Self {
            label,
            total,
            every: std::cmp::max(1, total / 10),
            start: Instant::now(),
            enabled,
        }
    }
    fn tick(&self, done: usize) {
        if !self.enabled || (done % self.every != 0 && done != self.total) {
            return;
        }
        let secs = self.start.elapsed().as_secs_f64();
        let rate = if secs > 0.0 { done as f64 / secs } else { 0.0 };
        println!(
            "[{:>14}] {:>7} / {:<7} ({:>5.1}%) {:.2}s, {:.0} ops/s",
            self.label,
            done,
            self.total,
            done as f64 * 100.0 / self.total.max(1) as f64,
            secs,
            rate
        );
    }
}

/// SheafDB micro-benchmark CLI
///
/// Примеры:
///   sheafdb_bench --path ./bench.sheaf --clean --json
///   sheafdb_bench --path ./bench.sheaf --clean --n 200000 --value-size 64
#[derive(Parser, Debug)]
#[command(name = "sheafdb_bench", version, about = "SheafDB micro-bench CLI")]
struct Opt {
    /// Data file path for the benchmark
    #[arg(long)]
    path: PathBuf,

    /// Remove the data file first (start from scratch)
    #[arg(long, default_value_t = false)]
    clean: bool,

    /// Documents to insert
    #[arg(long, default_value_t = 100_000)]
    n: u64,

    /// Document content size (bytes)
    #[arg(long, default_value_t = 128)]
    value_size: usize,

    /// Documents to relocate via oversized update
    #[arg(long, default_value_t = 10_000)]
    grow_n: u64,

    /// PRNG seed (0 falls back to a built-in constant)
    #[arg(long, default_value_t = 0x7A3C_19E5_0B4D_F221)]
    seed: u64,

    /// Emit the final report as a single JSON object
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Print per-phase progress lines
    #[arg(long, default_value_t = false)]
    progress: bool,
}

#[derive(Debug, Clone)]
struct PhaseStats {
    name: String,
    ops: u64,
    elapsed_s: f64,
    tput_ops: f64,
    p50_ms: f64,
    p90_ms: f64,
    p99_ms: f64,
}

impl PhaseStats {
    fn from_latencies(name: &str, ops: u64, elapsed: Duration, lat: &mut [Duration]) -> Self {
        lat.sort_unstable();
        let elapsed_s = elapsed.as_secs_f64();
        Self {
            name: name.to_string(),
            ops,
            elapsed_s,
            tput_ops: if elapsed_s > 0.0 { ops as f64 / elapsed_s } else { 0.0 },
            p50_ms: pct_ms(lat, 0.50),
            p90_ms: pct_ms(lat, 0.90),
            p99_ms: pct_ms(lat, 0.99),
        }
    }
}

fn pct_ms(sorted: &[Duration], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() - 1) as f64 * q).round() as usize;
    sorted[idx].as_secs_f64() * 1000.0
}

#[inline]
fn timed<T>(lat: &mut Vec<Duration>, f: impl FnOnce() -> T) -> T {
    let t0 = Instant::now();
    let out = f();
    lat.push(t0.elapsed());
    out
}

#[derive(Debug, Clone)]
struct BenchReport {
    phases: Vec<PhaseStats>,
    file_bytes: u64,
    size: u64,
    used_size: u64,
    metrics: SheafDB::metrics::MetricsSnapshot,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("sheafdb-bench: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let opt = Opt::parse();

    if opt.clean && opt.path.exists() {
        fs::remove_file(&opt.path).with_context(|| format!("remove {}", opt.path.display()))?;
    }

    // Сброс метрик перед запуском — чтобы отчёт был только про текущий прогон.
    SheafDB::metrics::reset();

    let mut store = DocStore::open(&opt.path)?;

    let n = opt.n as usize;
    let grow_n = (opt.grow_n as usize).min(n);
    let val = vec![0x5A; opt.value_size];
    let grow_val = vec![0x7E; opt.value_size * 4];

    let mut phases: Vec<PhaseStats> = Vec::new();
    let mut ids: Vec<u64> = Vec::with_capacity(n);

    // Phase A: insert
    println!("==> Phase: insert ({} docs, {} B each)", n, opt.value_size);
    phases.push(phase_insert(&opt, &mut store, &val, &mut ids)?);

    // Phase B: read hits, random order
    println!("==> Phase: read_hits ({} docs, random order)", ids.len());
    phases.push(phase_read_hits(&opt, &store, &ids)?);

    // Phase C: in-place updates (same content size fits the doubled room)
    println!("==> Phase: update_inplace ({} docs)", ids.len());
    phases.push(phase_update_inplace(&opt, &mut store, &ids, &val)?);

    // Phase D: oversized updates (forced relocation)
    println!("==> Phase: update_grow ({} docs, {} B each)", grow_n, grow_val.len());
    phases.push(phase_update_grow(&opt, &mut store, &mut ids, grow_n, &grow_val)?);

    // Phase E: delete every second document
    println!("==> Phase: delete ({} docs)", (ids.len() + 1) / 2);
    phases.push(phase_delete(&opt, &mut store, &ids)?);

    // Phase F: full scan over the churned file
    println!("==> Phase: scan");
    phases.push(phase_scan(&store)?);

    store.flush()?;

    let report = BenchReport {
        phases,
        file_bytes: fs::metadata(&opt.path).map(|m| m.len()).unwrap_or(0),
        size: store.size(),
        used_size: store.used_size(),
        metrics: SheafDB::metrics::snapshot(),
    };

    if opt.json {
        print_json_report(&report);
    } else {
        print_human_report(&report);
    }

    Ok(())
}

// ---------- phases ----------

fn phase_insert(opt: &Opt, store: &mut DocStore, val: &[u8], ids: &mut Vec<u64>) -> Result<PhaseStats> {
    let n = opt.n as usize;
    let mut lat = Vec::with_capacity(n);
    let prog = Progress::new("insert", n, opt.progress);
    let start = Instant::now();
    for i in 0..n {
        let id = timed(&mut lat, || store.insert(val))?;
        ids.push(id);
        prog.tick(i + 1);
    }
    let stats = PhaseStats::from_latencies("insert", n as u64, start.elapsed(), &mut lat);
    print_phase_line(&stats);
    Ok(stats)
}

fn phase_read_hits(opt: &Opt, store: &DocStore, ids: &[u64]) -> Result<PhaseStats> {
    // случайный порядок (Fisher–Yates)
    let mut order: Vec<usize> = (0..ids.len()).collect();
    let mut rng = XorShift64::new(opt.seed ^ 0xDEAD_BEEF_CAFE_BABE);
    for i in (1..order.len()).rev() {
        let j = rng.below(i as u64 + 1) as usize;
        order.swap(i, j);
    }

    let mut lat = Vec::with_capacity(ids.len());
    let prog = Progress::new("read_hits", ids.len(), opt.progress);
    let start = Instant::now();
    for (n, idx) in order.into_iter().enumerate() {
        let got = timed(&mut lat, || store.read(ids[idx]));
        if got.is_none() {
            return Err(anyhow!("read_hits: missing document at idx {}", idx));
        }
        prog.tick(n + 1);
    }
    let stats = PhaseStats::from_latencies("read_hits", ids.len() as u64, start.elapsed(), &mut lat);
    print_phase_line(&stats);
    Ok(stats)
}

fn phase_update_inplace(opt: &Opt, store: &mut DocStore, ids: &[u64], val: &[u8]) -> Result<PhaseStats> {
    let mut lat = Vec::with_capacity(ids.len());
    let prog = Progress::new("update_inplace", ids.len(), opt.progress);
    let start = Instant::now();
    for (i, &id) in ids.iter().enumerate() {
        let new_id = timed(&mut lat, || store.update(id, val))?;
        if new_id != id {
            return Err(anyhow!("update_inplace: unexpected relocation {} -> {}", id, new_id));
        }
        prog.tick(i + 1);
    }
    let stats = PhaseStats::from_latencies("update_inplace", ids.len() as u64, start.elapsed(), &mut lat);
    print_phase_line(&stats);
    Ok(stats)
}

fn phase_update_grow(
    opt: &Opt,
    store: &mut DocStore,
    ids: &mut [u64],
    grow_n: usize,
    grow_val: &[u8],
) -> Result<PhaseStats> {
    let mut lat = Vec::with_capacity(grow_n);
    let prog = Progress::new("update_grow", grow_n, opt.progress);
    let start = Instant::now();
    for i in 0..grow_n {
        let new_id = timed(&mut lat, || store.update(ids[i], grow_val))?;
        if new_id == ids[i] {
            return Err(anyhow!("update_grow: expected relocation for {}", ids[i]));
        }
        ids[i] = new_id;
        prog.tick(i + 1);
    }
    let stats = PhaseStats::from_latencies("update_grow", grow_n as u64, start.elapsed(), &mut lat);
    print_phase_line(&stats);
    Ok(stats)
}

fn phase_delete(opt: &Opt, store: &mut DocStore, ids: &[u64]) -> Result<PhaseStats> {
    let victims: Vec<u64> = ids.iter().copied().step_by(2).collect();
    let mut lat = Vec::with_capacity(victims.len());
    let prog = Progress::new("delete", victims.len(), opt.progress);
    let start = Instant::now();
    for (i, &id) in victims.iter().enumerate() {
        timed(&mut lat, || store.delete(id));
        prog.tick(i + 1);
    }
    let stats = PhaseStats::from_latencies("delete", victims.len() as u64, start.elapsed(), &mut lat);
    print_phase_line(&stats);
    Ok(stats)
}

fn phase_scan(store: &DocStore) -> Result<PhaseStats> {
    let start = Instant::now();
    let mut docs = 0u64;
    let mut bytes = 0u64;
    let scan = store.for_all(|_, payload| {
        docs += 1;
        bytes += payload.len() as u64;
        true
    });
    let elapsed = start.elapsed();
    if scan.corruptions > 0 {
        return Err(anyhow!("scan: {} corrupted headers in a fresh bench file", scan.corruptions));
    }
    println!(
        "    scan done: {} docs, {} payload bytes, {} deleted slots, {:.3}s",
        docs,
        bytes,
        scan.deleted,
        elapsed.as_secs_f64()
    );
    Ok(PhaseStats::from_latencies("scan", docs, elapsed, &mut [elapsed]))
}

// ---------- reporting ----------

fn print_phase_line(p: &PhaseStats) {
    println!(
        "    {:>14} done: ops={} in {:.3}s, {:.0} ops/s, p50={:.3}ms p90={:.3}ms p99={:.3}ms",
        p.name, p.ops, p.elapsed_s, p.tput_ops, p.p50_ms, p.p90_ms, p.p99_ms
    );
}

fn print_human_report(r: &BenchReport) {
    println!("SheafDB bench report:");
    println!("  file_bytes = {}", r.file_bytes);
    println!("  size       = {}", r.size);
    println!("  used_size  = {}", r.used_size);
    println!("Phases:");
    for p in &r.phases {
        print_phase_line(p);
    }
    let m = &r.metrics;
    println!("Metrics snapshot:");
    println!("  docs_inserted        = {}", m.docs_inserted);
    println!("  docs_read            = {}", m.docs_read);
    println!("  docs_updated_inplace = {}", m.docs_updated_inplace);
    println!("  docs_relocated       = {}", m.docs_relocated);
    println!("  docs_deleted         = {}", m.docs_deleted);
    println!("  inplace_update_ratio = {:.2}", m.inplace_update_ratio());
    println!("  file_growths         = {}", m.file_growths);
    println!("  file_growth_bytes    = {}", m.file_growth_bytes);
}

fn print_json_report(r: &BenchReport) {
    let phases: Vec<String> = r
        .phases
        .iter()
        .map(|p| {
            format!(
                "{{\"name\":\"{}\",\"ops\":{},\"elapsed_sec\":{:.6},\"tput_ops\":{:.2},\"p50_ms\":{:.3},\"p90_ms\":{:.3},\"p99_ms\":{:.3}}}",
                p.name, p.ops, p.elapsed_s, p.tput_ops, p.p50_ms, p.p90_ms, p.p99_ms
            )
        })
        .collect();
    let m = &r.metrics;
    let metrics = format!(
        "{{\"docs_inserted\":{},\"docs_read\":{},\"docs_updated_inplace\":{},\"docs_relocated\":{},\"docs_deleted\":{},\"inplace_update_ratio\":{:.2},\"file_growths\":{},\"file_growth_bytes\":{}}}",
        m.docs_inserted,
        m.docs_read,
        m.docs_updated_inplace,
        m.docs_relocated,
        m.docs_deleted,
        m.inplace_update_ratio(),
        m.file_growths,
        m.file_growth_bytes
    );
    println!(
        "{{\"file_bytes\":{},\"size\":{},\"used_size\":{},\"phases\":[{}],\"metrics\":{}}}",
        r.file_bytes,
        r.size,
        r.used_size,
        phases.join(","),
        metrics
    );
}

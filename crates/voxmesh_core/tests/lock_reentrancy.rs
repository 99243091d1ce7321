//! # Grid Lock Re-entrancy
//!
//! A meshing thread holding the read guard must still be able to query the
//! grid while an editor is blocked waiting to write.

use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use voxmesh_core::{GridPos, VoxelGrid};

/// Test: Nested reads complete while a writer is queued behind the guard.
#[test]
fn test_nested_read_with_queued_writer() {
    let grid = Arc::new(VoxelGrid::with_size([4, 4, 4]).expect("valid size"));
    let (locked_tx, locked_rx) = mpsc::channel();
    let (go_tx, go_rx) = mpsc::channel::<()>();
    let (done_tx, done_rx) = mpsc::channel();

    let reader = {
        let grid = Arc::clone(&grid);
        thread::spawn(move || {
            let guard = grid.read();
            locked_tx.send(()).unwrap();
            go_rx.recv().unwrap();

            // Writer is parked behind `guard` by now.
            let nested = (grid.size(), grid.voxel_count(), grid.bbox());
            let snapshot_len = grid.snapshot().len();
            done_tx.send((nested, snapshot_len, guard.len())).unwrap();
        })
    };

    locked_rx.recv().unwrap();
    let writer = {
        let grid = Arc::clone(&grid);
        thread::spawn(move || grid.set_voxel(GridPos::ZERO, 1, 0, false))
    };
    thread::sleep(Duration::from_millis(50));
    go_tx.send(()).unwrap();

    let ((size, count, bbox), snapshot_len, held_len) = done_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("nested read deadlocked behind queued writer");
    assert_eq!(size, GridPos::new(4, 4, 4));
    assert_eq!(count, 0);
    assert!(bbox.is_none());
    assert_eq!(snapshot_len, 0);
    assert_eq!(held_len, 0);

    reader.join().unwrap();
    writer.join().unwrap().unwrap();
    assert_eq!(grid.voxel_count(), 1);
}

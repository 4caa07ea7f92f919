use bytes::BytesMut;
use tracing_subscriber::EnvFilter;

use tuplecore::memory::{ObjectHeap, Pool};
use tuplecore::tuple::{DataType, PoolBackedTuple, Schema, StandaloneTuple, Value};

fn main() -> tuplecore::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    println!("Tuplecore - row storage for an in-memory relational engine");
    println!("==========================================================\n");

    let schema = Schema::builder()
        .column("id", DataType::Integer)
        .column("code", DataType::VarChar(8))
        .nullable_column("description", DataType::VarChar(200))
        .nullable_column("price", DataType::Decimal)
        .build_arc();
    println!("{}\n", schema);

    // Scratch row built outside any table
    let mut scratch = StandaloneTuple::new(schema.clone());
    {
        let mut row = scratch.tuple_mut();
        row.set_value(0, &Value::Integer(42))?;
        row.set_value(1, &Value::from("short"))?;
        row.set_value_with_copy(2, &Value::from("a description too long to inline"), None)?;
        row.set_value(3, &Value::from("19.99"))?;
    }
    println!("Scratch row: {}", scratch.tuple().debug("scratch"));

    // Move it into pool-owned storage
    let pool = Pool::new();
    let mut stored = PoolBackedTuple::allocate_active(schema.clone(), &pool);
    stored.tuple_mut().copy_for_insert(&scratch.tuple(), Some(&pool))?;
    println!("Stored row:  {}", stored.tuple().debug("items"));
    println!(
        "  - out-of-line bytes charged: {}",
        stored.tuple().non_inlined_memory_size()?
    );

    // Generic wire round trip
    let mut wire = BytesMut::new();
    stored.tuple().serialize_to(&mut wire)?;
    let mut decoded = StandaloneTuple::new(schema.clone());
    decoded
        .tuple_mut()
        .deserialize_from(&mut wire.clone().freeze(), None)?;
    println!("\nSerialized {} bytes", wire.len());
    println!(
        "  - round trip equal: {}",
        decoded.tuple().equals_ignoring_schema(&stored.tuple())?
    );

    // Export with one NULL column
    stored.tuple_mut().set_value(3, &Value::Null)?;
    let mut export = BytesMut::new();
    let mut null_bitmap = [0u8; 1];
    stored
        .tuple()
        .serialize_to_export(&mut export, 0, &mut null_bitmap)?;
    println!("\nExported {} bytes", export.len());
    println!(
        "  - bound: {} bytes",
        stored.tuple().max_export_serialization_size()?
    );
    println!("  - null bitmap: {:08b}", null_bitmap[0]);

    scratch.tuple_mut().free_object_columns()?;
    decoded.tuple_mut().free_object_columns()?;
    drop(stored);
    drop(pool);
    println!(
        "\nLive objects after cleanup: {}",
        ObjectHeap::global().live_objects()
    );

    println!("\nDemo completed successfully!");
    Ok(())
}

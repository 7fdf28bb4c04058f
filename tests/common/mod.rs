//! Common test utilities for building catalogs, methods and classes.
use printgraph::*;

/// Install a test-friendly tracing subscriber once per process.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[allow(dead_code)]
pub fn ty(name: &str) -> TypeSpecifier {
    TypeSpecifier::from_type_name(name)
}

/// Catalog with `Game.Derived : Game.Base` and a `Game.Player` type.
#[allow(dead_code)]
pub fn game_catalog() -> MemoryTypeCatalog {
    MemoryTypeCatalog::new()
        .with_type(ty("Game.Base"), [])
        .with_type(ty("Game.Derived"), [ty("Game.Base")])
        .with_type(ty("Game.Player"), [])
}

#[allow(dead_code)]
pub fn add(method: &mut Method, kind: NodeKind) -> NodeId {
    method.add_node(kind, Position::default()).expect("node should be added")
}

#[allow(dead_code)]
pub fn exec(method: &mut Method, from: NodeId, slot: usize, to: NodeId, catalog: &dyn TypeCatalog) {
    method
        .connect(PinRef::output_exec(from, slot), PinRef::input_exec(to, 0), catalog)
        .expect("exec link should connect");
}

#[allow(dead_code)]
pub fn data(method: &mut Method, from: NodeId, out: usize, to: NodeId, input: usize, catalog: &dyn TypeCatalog) {
    method
        .connect(PinRef::output_data(from, out), PinRef::input_data(to, input), catalog)
        .expect("data link should connect");
}

/// `Entry -> Foo() -> Return`, with `Foo`'s target read from the `this` variable.
#[allow(dead_code)]
pub fn create_call_on_self(catalog: &dyn TypeCatalog) -> Method {
    let mut method = Method::new("Run", vec![], vec![]);
    let entry = method.entry_id();
    let getter = add(&mut method, NodeKind::getter("this", ty("Game.Player")));
    let call = add(&mut method, NodeKind::call_method("Foo", vec![], vec![]));
    let ret = add(&mut method, NodeKind::Return { return_types: vec![] });

    exec(&mut method, entry, 0, call, catalog);
    exec(&mut method, call, 0, ret, catalog);
    data(&mut method, getter, 0, call, 0, catalog);
    method
}

/// A call whose `Int32` argument is left unconnected.
#[allow(dead_code)]
pub fn create_missing_argument(catalog: &dyn TypeCatalog) -> (Method, NodeId) {
    let mut method = Method::new("Broken", vec![ty("Game.Player")], vec![]);
    let entry = method.entry_id();
    let call = add(
        &mut method,
        NodeKind::call_method("Damage", vec![TypeSpecifier::int()], vec![]),
    );

    exec(&mut method, entry, 0, call, catalog);
    data(&mut method, entry, 0, call, 0, catalog);
    (method, call)
}

/// A `Player` class with one field, a working method and a broken one.
#[allow(dead_code)]
pub fn create_player_class(catalog: &dyn TypeCatalog) -> Class {
    let mut class = Class::new("Player", "Game");
    class
        .add_attribute(
            Variable::new("health", TypeSpecifier::int())
                .with_modifiers([VariableModifier::Public])
                .with_initial_value("100"),
        )
        .expect("attribute should be added");
    class
        .add_method(create_call_on_self(catalog))
        .expect("method should be added");
    class
}

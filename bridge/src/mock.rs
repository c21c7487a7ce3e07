//! A scripted [`HostBridge`] with a tiny in-memory object model.
//!
//! Classes exist once they are declared or have a method registered on them.
//! Method behaviour is supplied as closures keyed by class and method name,
//! and every invocation is recorded so tests can assert on what was called.

use std::collections::{HashMap, HashSet};
use std::ffi::CString;
use std::fmt;

use crate::{
    Arg, BridgeError, BridgeResult, ClassHandle, FieldHandle, HostBridge, MethodHandle,
    ObjectHandle, StaticMethodHandle, Value,
};

const STRING_CLASS: &str = "java/lang/String";
const STRING_ARRAY_CLASS: &str = "[Ljava/lang/String;";
const LIST_CLASS: &str = "java/util/ArrayList";

#[derive(Debug, Clone)]
enum MockObject {
    Plain(String),
    Str(String),
    StrArray(Vec<String>),
    List(Vec<ObjectHandle>),
}

impl MockObject {
    fn class_name(&self) -> &str {
        match self {
            Self::Plain(class) => class,
            Self::Str(_) => STRING_CLASS,
            Self::StrArray(_) => STRING_ARRAY_CLASS,
            Self::List(_) => LIST_CLASS,
        }
    }
}

/// Objects allocated by a [`MockBridge`].
#[derive(Debug, Default)]
pub struct MockHeap {
    objects: Vec<MockObject>,
}

impl MockHeap {
    fn alloc(&mut self, object: MockObject) -> ObjectHandle {
        self.objects.push(object);
        ObjectHandle::from_index(self.objects.len() - 1)
    }

    fn get(&self, handle: ObjectHandle) -> BridgeResult<&MockObject> {
        self.objects
            .get(handle.index())
            .ok_or(BridgeError::InvalidHandle)
    }

    /// Contents of a string object.
    #[must_use]
    pub fn string(&self, handle: ObjectHandle) -> Option<&str> {
        match self.get(handle).ok()? {
            MockObject::Str(text) => Some(text),
            _ => None,
        }
    }

    /// Elements of a list object.
    #[must_use]
    pub fn list(&self, handle: ObjectHandle) -> Option<&[ObjectHandle]> {
        match self.get(handle).ok()? {
            MockObject::List(items) => Some(items),
            _ => None,
        }
    }
}

/// The receiver and arguments of one scripted invocation.
#[derive(Debug)]
pub struct Call<'a> {
    /// Receiver, `None` for static calls.
    pub target: Option<ObjectHandle>,
    /// Arguments as passed.
    pub args: &'a [Arg],
    /// Object model, for reading strings and lists.
    pub heap: &'a MockHeap,
}

impl Call<'_> {
    /// The `int` argument at `position`, if there is one.
    #[must_use]
    pub fn int_arg(&self, position: usize) -> Option<i32> {
        match self.args.get(position)? {
            Arg::Int(value) => Some(*value),
            Arg::Object(_) => None,
        }
    }

    /// The string argument at `position`, if there is one.
    #[must_use]
    pub fn string_arg(&self, position: usize) -> Option<&str> {
        match self.args.get(position)? {
            Arg::Object(handle) => self.heap.string(*handle),
            Arg::Int(_) => None,
        }
    }

    /// Elements of the receiver when it is a list, empty otherwise.
    #[must_use]
    pub fn target_list(&self) -> &[ObjectHandle] {
        self.target
            .and_then(|target| self.heap.list(target))
            .unwrap_or_default()
    }
}

/// An argument as seen by the recorder, with managed strings decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedArg {
    /// An `int`.
    Int(i32),
    /// A managed string.
    Str(String),
    /// A managed `String[]`.
    StrArray(Vec<String>),
    /// Any other object, by class name.
    Object(String),
}

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Class the method was resolved on.
    pub class: String,
    /// Method name.
    pub method: String,
    /// Decoded arguments.
    pub args: Vec<RecordedArg>,
}

type Responder = Box<dyn FnMut(&Call<'_>) -> BridgeResult<Value>>;

#[derive(Debug, Clone)]
struct Member {
    class: String,
    name: String,
}

/// In-memory [`HostBridge`].
#[derive(Default)]
pub struct MockBridge {
    heap: MockHeap,
    known: HashSet<String>,
    classes: Vec<String>,
    methods: Vec<Member>,
    static_methods: Vec<Member>,
    fields: Vec<Member>,
    responders: HashMap<(String, String), Responder>,
    static_fields: HashMap<(String, String), Value>,
    calls: Vec<RecordedCall>,
}

impl fmt::Debug for MockBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockBridge")
            .field("known", &self.known)
            .field("objects", &self.heap.objects.len())
            .field("calls", &self.calls.len())
            .finish_non_exhaustive()
    }
}

impl MockBridge {
    /// An empty runtime with no classes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `class` resolvable.
    pub fn define_class(&mut self, class: &str) -> &mut Self {
        self.known.insert(class.to_owned());
        self
    }

    /// Make `class` unresolvable.
    pub fn remove_class(&mut self, class: &str) -> &mut Self {
        self.known.remove(class);
        self
    }

    /// Script a method (static or instance) of `class`.
    pub fn on_method<F>(&mut self, class: &str, name: &str, mut responder: F) -> &mut Self
    where
        F: FnMut(&Call<'_>) -> Value + 'static,
    {
        self.on_method_try(class, name, move |call| Ok(responder(call)))
    }

    /// Script a method whose responder may fail.
    pub fn on_method_try<F>(&mut self, class: &str, name: &str, responder: F) -> &mut Self
    where
        F: FnMut(&Call<'_>) -> BridgeResult<Value> + 'static,
    {
        self.define_class(class);
        self.responders
            .insert((class.to_owned(), name.to_owned()), Box::new(responder));
        self
    }

    /// Declare a static field of `class` holding `value`.
    pub fn static_field(&mut self, class: &str, name: &str, value: Value) -> &mut Self {
        self.define_class(class);
        self.static_fields
            .insert((class.to_owned(), name.to_owned()), value);
        self
    }

    /// Allocate a plain object of `class`.
    pub fn new_object(&mut self, class: &str) -> ObjectHandle {
        self.heap.alloc(MockObject::Plain(class.to_owned()))
    }

    /// Allocate a `java.util.ArrayList` holding `items`.
    pub fn new_list(&mut self, items: Vec<ObjectHandle>) -> ObjectHandle {
        self.heap.alloc(MockObject::List(items))
    }

    /// Name of a class handle issued by this bridge.
    #[must_use]
    pub fn class_name(&self, class: ClassHandle) -> Option<&str> {
        self.classes.get(class.index()).map(String::as_str)
    }

    /// Whether `object` refers to an allocated object.
    #[must_use]
    pub fn is_live(&self, object: ObjectHandle) -> bool {
        self.heap.get(object).is_ok()
    }

    /// Every invocation so far, in order.
    #[must_use]
    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    /// Invocations of methods called `method`.
    pub fn calls_to<'a>(&'a self, method: &'a str) -> impl Iterator<Item = &'a RecordedCall> + 'a {
        self.calls.iter().filter(move |call| call.method == method)
    }

    fn class(&self, class: ClassHandle) -> BridgeResult<&str> {
        self.class_name(class).ok_or(BridgeError::InvalidHandle)
    }

    fn issue_class(&mut self, name: &str) -> ClassHandle {
        self.classes.push(name.to_owned());
        ClassHandle::from_index(self.classes.len() - 1)
    }

    fn member(&self, class: ClassHandle, name: &str, signature: &str) -> BridgeResult<Member> {
        let class = self.class(class)?;
        if self
            .responders
            .contains_key(&(class.to_owned(), name.to_owned()))
        {
            Ok(Member {
                class: class.to_owned(),
                name: name.to_owned(),
            })
        } else {
            Err(BridgeError::MethodNotFound {
                name: name.to_owned(),
                signature: signature.to_owned(),
            })
        }
    }

    fn record(&self, member: &Member, args: &[Arg]) -> BridgeResult<RecordedCall> {
        let args = args
            .iter()
            .map(|arg| match arg {
                Arg::Int(value) => Ok(RecordedArg::Int(*value)),
                Arg::Object(handle) => Ok(match self.heap.get(*handle)? {
                    MockObject::Str(text) => RecordedArg::Str(text.clone()),
                    MockObject::StrArray(items) => RecordedArg::StrArray(items.clone()),
                    other => RecordedArg::Object(other.class_name().to_owned()),
                }),
            })
            .collect::<BridgeResult<Vec<_>>>()?;

        Ok(RecordedCall {
            class: member.class.clone(),
            method: member.name.clone(),
            args,
        })
    }

    fn invoke(
        &mut self,
        member: &Member,
        target: Option<ObjectHandle>,
        args: &[Arg],
    ) -> BridgeResult<Value> {
        if let Some(target) = target {
            self.heap.get(target)?;
        }
        let recorded = self.record(member, args)?;
        self.calls.push(recorded);

        let key = (member.class.clone(), member.name.clone());
        let responder = self
            .responders
            .get_mut(&key)
            .ok_or_else(|| BridgeError::MethodNotFound {
                name: member.name.clone(),
                signature: String::new(),
            })?;
        responder(&Call {
            target,
            args,
            heap: &self.heap,
        })
    }
}

impl HostBridge for MockBridge {
    fn find_class(&mut self, name: &str) -> BridgeResult<ClassHandle> {
        if self.known.contains(name) {
            Ok(self.issue_class(name))
        } else {
            Err(BridgeError::ClassNotFound {
                name: name.to_owned(),
            })
        }
    }

    fn object_class(&mut self, object: ObjectHandle) -> BridgeResult<ClassHandle> {
        let name = self.heap.get(object)?.class_name().to_owned();
        Ok(self.issue_class(&name))
    }

    fn find_method(
        &mut self,
        class: ClassHandle,
        name: &str,
        signature: &str,
    ) -> BridgeResult<MethodHandle> {
        let member = self.member(class, name, signature)?;
        self.methods.push(member);
        Ok(MethodHandle::from_index(self.methods.len() - 1))
    }

    fn find_static_method(
        &mut self,
        class: ClassHandle,
        name: &str,
        signature: &str,
    ) -> BridgeResult<StaticMethodHandle> {
        let member = self.member(class, name, signature)?;
        self.static_methods.push(member);
        Ok(StaticMethodHandle::from_index(self.static_methods.len() - 1))
    }

    fn find_static_field(
        &mut self,
        class: ClassHandle,
        name: &str,
        signature: &str,
    ) -> BridgeResult<FieldHandle> {
        let class = self.class(class)?.to_owned();
        if !self
            .static_fields
            .contains_key(&(class.clone(), name.to_owned()))
        {
            return Err(BridgeError::FieldNotFound {
                name: name.to_owned(),
                signature: signature.to_owned(),
            });
        }
        self.fields.push(Member {
            class,
            name: name.to_owned(),
        });
        Ok(FieldHandle::from_index(self.fields.len() - 1))
    }

    fn get_static_field(&mut self, class: ClassHandle, field: FieldHandle) -> BridgeResult<Value> {
        self.class(class)?;
        let member = self
            .fields
            .get(field.index())
            .ok_or(BridgeError::InvalidHandle)?;
        self.static_fields
            .get(&(member.class.clone(), member.name.clone()))
            .copied()
            .ok_or(BridgeError::InvalidHandle)
    }

    fn call_method(
        &mut self,
        target: ObjectHandle,
        method: MethodHandle,
        args: &[Arg],
    ) -> BridgeResult<Value> {
        let member = self
            .methods
            .get(method.index())
            .cloned()
            .ok_or(BridgeError::InvalidHandle)?;
        self.invoke(&member, Some(target), args)
    }

    fn call_static_method(
        &mut self,
        class: ClassHandle,
        method: StaticMethodHandle,
        args: &[Arg],
    ) -> BridgeResult<Value> {
        self.class(class)?;
        let member = self
            .static_methods
            .get(method.index())
            .cloned()
            .ok_or(BridgeError::InvalidHandle)?;
        self.invoke(&member, None, args)
    }

    fn new_string(&mut self, text: &str) -> BridgeResult<ObjectHandle> {
        Ok(self.heap.alloc(MockObject::Str(text.to_owned())))
    }

    fn new_string_array(&mut self, items: &[&str]) -> BridgeResult<ObjectHandle> {
        let items = items.iter().map(|item| (*item).to_owned()).collect();
        Ok(self.heap.alloc(MockObject::StrArray(items)))
    }

    fn read_string(&mut self, string: ObjectHandle) -> BridgeResult<String> {
        match self.heap.get(string)? {
            MockObject::Str(text) => Ok(text.clone()),
            _ => Err(BridgeError::UnexpectedValue {
                expected: "string",
                found: "object",
            }),
        }
    }

    fn read_utf_chars(&mut self, string: ObjectHandle) -> BridgeResult<CString> {
        let text = self.read_string(string)?;
        CString::new(modified_utf8(&text)).map_err(|err| BridgeError::Platform(err.to_string()))
    }
}

/// Encode `text` the way `GetStringUTFChars` does: UTF-16 units written as
/// one to three bytes each, with U+0000 as `C0 80`.
#[allow(clippy::cast_possible_truncation)]
fn modified_utf8(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for unit in text.encode_utf16() {
        match unit {
            0x0001..=0x007F => bytes.push(unit as u8),
            0x0000 | 0x0080..=0x07FF => {
                bytes.extend([0xC0 | (unit >> 6) as u8, 0x80 | (unit & 0x3F) as u8]);
            }
            _ => bytes.extend([
                0xE0 | (unit >> 12) as u8,
                0x80 | ((unit >> 6) & 0x3F) as u8,
                0x80 | (unit & 0x3F) as u8,
            ]),
        }
    }
    bytes
}

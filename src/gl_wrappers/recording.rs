//! A [`ShaderBackend`] that records every call instead of talking to a GPU.
use std::{
    cell::RefCell,
    collections::BTreeMap,
    ffi::CStr,
};

use gl::types::{GLint, GLuint};

use super::{ShaderBackend, ShaderKind};

pub const VERTEX_OK: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
void main() {
    gl_Position = vec4(aPos, 1.0);
}
";

pub const FRAGMENT_OK: &str = "#version 330 core
out vec4 FragColor;
uniform float iTime;
uniform vec2 iResolution;
void main() {
    FragColor = vec4(gl_FragCoord.xy / iResolution, sin(iTime), 1.0);
}
";

pub const SYNTAX_ERROR: &str = "#version 330 core
out vec4 FragColor;
void main() {
    FragColor = vec4(1.0)
}
";

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    CreateShader(ShaderKind, GLuint),
    CompileShader(GLuint),
    DeleteShader(GLuint),
    CreateProgram(GLuint),
    AttachShader(GLuint, GLuint),
    LinkProgram(GLuint),
    UseProgram(GLuint),
    DeleteProgram(GLuint),
    Uniform1f(GLint, f32),
    Uniform2f(GLint, f32, f32),
}

#[derive(Default)]
struct ShaderState {
    source: String,
    compiled: bool,
}

#[derive(Default)]
struct ProgramState {
    attached: Vec<GLuint>,
    /// Uniform names, index is the location. Empty unless linked.
    uniforms: Vec<String>,
}

#[derive(Default)]
struct State {
    last_id: GLuint,
    calls: Vec<Call>,
    shaders: BTreeMap<GLuint, ShaderState>,
    programs: BTreeMap<GLuint, ProgramState>,
    current: Option<GLuint>,
}

impl State {
    fn next_id(&mut self) -> GLuint {
        self.last_id += 1;
        self.last_id
    }
}

/// Pretend driver.
///
/// Compilation fails on a line that assigns without a trailing `;`, linking
/// fails if any attached shader failed to compile. Uniforms are whatever the
/// attached sources declare with `uniform <type> <name>;`.
///
/// Deleting an object that is not alive panics, so double deletes show up.
#[derive(Default)]
pub struct RecordingBackend {
    state: RefCell<State>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }
    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }
    pub fn live_shaders(&self) -> Vec<GLuint> {
        self.state.borrow().shaders.keys().copied().collect()
    }
    pub fn live_programs(&self) -> Vec<GLuint> {
        self.state.borrow().programs.keys().copied().collect()
    }
    pub fn current_program(&self) -> Option<GLuint> {
        self.state.borrow().current
    }
}

fn check_syntax(source: &str) -> Result<(), String> {
    for (line_no, line) in source.lines().enumerate() {
        let line = line.trim();
        if line.contains('=') && !line.ends_with(';') {
            return Err(format!(
                "0:{}(1): error: syntax error, unexpected '}}', expecting ';'",
                line_no + 2
            ));
        }
    }
    Ok(())
}

fn declared_uniforms(source: &str) -> impl Iterator<Item = String> + '_ {
    source.lines().filter_map(|line| {
        let rest = line.trim().strip_prefix("uniform ")?;
        let name = rest.split_whitespace().nth(1)?;
        Some(name.trim_end_matches(';').to_owned())
    })
}

impl ShaderBackend for RecordingBackend {
    fn create_shader(&self, kind: ShaderKind) -> GLuint {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        state.shaders.insert(id, ShaderState::default());
        state.calls.push(Call::CreateShader(kind, id));
        id
    }

    fn compile_shader(&self, shader: GLuint, source: &CStr) -> Result<(), String> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::CompileShader(shader));
        let text = source.to_string_lossy().into_owned();
        let result = check_syntax(&text);
        let entry = state
            .shaders
            .get_mut(&shader)
            .unwrap_or_else(|| panic!("compiling unknown shader {shader}"));
        entry.source = text;
        entry.compiled = result.is_ok();
        result
    }

    fn delete_shader(&self, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        assert!(
            state.shaders.remove(&shader).is_some(),
            "deleting shader {shader} which is not alive"
        );
        state.calls.push(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> GLuint {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        state.programs.insert(id, ProgramState::default());
        state.calls.push(Call::CreateProgram(id));
        id
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        assert!(state.shaders.contains_key(&shader), "attaching dead shader {shader}");
        state
            .programs
            .get_mut(&program)
            .unwrap_or_else(|| panic!("attaching to dead program {program}"))
            .attached
            .push(shader);
        state.calls.push(Call::AttachShader(program, shader));
    }

    fn link_program(&self, program: GLuint) -> Result<(), String> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::LinkProgram(program));
        let attached = state.programs[&program].attached.clone();

        let mut uniforms = Vec::new();
        for shader in &attached {
            let shader = &state.shaders[shader];
            if !shader.compiled {
                return Err("error: linking with uncompiled/unspecialized shader".to_owned());
            }
            for name in declared_uniforms(&shader.source) {
                if !uniforms.contains(&name) {
                    uniforms.push(name);
                }
            }
        }
        if let Some(entry) = state.programs.get_mut(&program) {
            entry.uniforms = uniforms;
        }
        Ok(())
    }

    fn use_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        assert!(state.programs.contains_key(&program), "using dead program {program}");
        state.current = Some(program);
        state.calls.push(Call::UseProgram(program));
    }

    fn delete_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        assert!(
            state.programs.remove(&program).is_some(),
            "deleting program {program} which is not alive"
        );
        if state.current == Some(program) {
            state.current = None;
        }
        state.calls.push(Call::DeleteProgram(program));
    }

    fn uniform_location(&self, program: GLuint, name: &CStr) -> Option<GLint> {
        let state = self.state.borrow();
        let name = name.to_str().ok()?;
        let position = state.programs.get(&program)?.uniforms.iter().position(|u| u == name)?;
        GLint::try_from(position).ok()
    }

    fn uniform_1f(&self, location: GLint, value: f32) {
        self.state.borrow_mut().calls.push(Call::Uniform1f(location, value));
    }

    fn uniform_2f(&self, location: GLint, x: f32, y: f32) {
        self.state.borrow_mut().calls.push(Call::Uniform2f(location, x, y));
    }
}
